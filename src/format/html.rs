//! Static HTML rendering for transparency reports

use crate::report::ReportData;
use std::fmt::Write;

fn esc(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render a transparency report as a self-contained HTML page
pub fn render_transparency_html(data: &ReportData) -> String {
    let mut rows = String::new();
    for tx in &data.activity.large_transactions {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td><code>{}</code></td><td class=\"num\">{}</td></tr>",
            tx.created_at.format("%Y-%m-%d %H:%M UTC"),
            esc(&tx.to),
            tx.amount.normalize()
        );
    }
    let large_section = if rows.is_empty() {
        "<p>No large transactions in this period.</p>".to_string()
    } else {
        format!(
            "<table><thead><tr><th>Date</th><th>Recipient</th>\
             <th class=\"num\">Amount</th></tr></thead><tbody>{}</tbody></table>",
            rows
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{token} Transparency Report - {period}</title>
<style>
body {{ font-family: sans-serif; max-width: 800px; margin: 2em auto; color: #222; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #ccc; padding: 0.4em 0.8em; text-align: left; }}
td.num, th.num {{ text-align: right; }}
dl {{ display: grid; grid-template-columns: max-content auto; gap: 0.2em 1em; }}
dt {{ font-weight: bold; }}
code {{ word-break: break-all; }}
</style>
</head>
<body>
<h1>{token} Transparency Report</h1>
<p>Period: {period} &middot; Network: {network} &middot; Generated: {generated}</p>
<h2>Supply</h2>
<dl>
<dt>Token</dt><dd>{token}</dd>
<dt>Issuer</dt><dd><code>{issuer}</code></dd>
<dt>Declared supply</dt><dd>{declared}</dd>
<dt>Observed issued</dt><dd>{issued}</dd>
</dl>
<h2>Activity</h2>
<dl>
<dt>Transactions</dt><dd>{txs}</dd>
<dt>Payments</dt><dd>{payments}</dd>
<dt>Volume</dt><dd>{volume}</dd>
<dt>Average payment</dt><dd>{average}</dd>
<dt>Largest payment</dt><dd>{largest}</dd>
<dt>Unique recipients</dt><dd>{recipients}</dd>
</dl>
<h2>Large Transactions</h2>
{large}
</body>
</html>
"#,
        token = esc(&data.token_code),
        period = esc(&data.period),
        network = esc(&data.network),
        generated = data.generated_at.format("%Y-%m-%d %H:%M UTC"),
        issuer = esc(&data.issuer),
        declared = data.supply.declared_supply.normalize(),
        issued = data.supply.observed_issued.normalize(),
        txs = data.activity.transaction_count,
        payments = data.activity.payment_count,
        volume = data.activity.total_volume.normalize(),
        average = data.activity.average_payment.normalize(),
        largest = data.activity.largest_payment.normalize(),
        recipients = data.activity.unique_recipients,
        large = large_section,
    )
}
