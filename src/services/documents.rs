//! Printable purchase-order sheets.
//!
//! Renders a ledger order as a self-contained HTML document laid out for
//! A4 printing. Party names are resolved against the current master data
//! at render time; only the order's own line snapshots are frozen.

use std::fmt::Write as _;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::models::Order;
use crate::services::masters::MasterDataService;
use crate::services::orders::OrderService;

/// Rows always shown in the item table, padded with blanks when the order
/// has fewer lines.
const MIN_ITEM_ROWS: usize = 8;

const COMPANY_NAME: &str = "いしだクリーニング";
const COMPANY_POSTAL: &str = "〒720-0092";
const COMPANY_ADDRESS: &str = "広島県福山市山手町3-6-1";
const COMPANY_TEL: &str = "TEL: 084-952-0041";

#[derive(Clone)]
pub struct DocumentService {
    orders: Arc<OrderService>,
    masters: Arc<MasterDataService>,
}

impl DocumentService {
    pub fn new(orders: Arc<OrderService>, masters: Arc<MasterDataService>) -> Self {
        Self { orders, masters }
    }

    /// Renders the purchase-order sheet for an order, or `None` when the
    /// order id is not in the ledger.
    pub async fn render(&self, order_id: &str) -> Option<String> {
        let order = self.orders.get_order(order_id).await.ok()?;
        let source_name = self.masters.display_name(&order.source_id).await;
        let destination_name = self.masters.display_name(&order.destination_id).await;
        Some(render_sheet(&order, &source_name, &destination_name))
    }

    /// Friendly page served when the order id does not exist.
    pub fn not_found_page(&self, order_id: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="ja">
<head><meta charset="utf-8"><title>発注書が見つかりません</title></head>
<body style="font-family: sans-serif; text-align: center; padding: 4rem;">
  <h1>発注書が見つかりません</h1>
  <p>発注番号 {} の発注データは存在しません。</p>
</body>
</html>
"#,
            escape_html(order_id)
        )
    }
}

fn render_sheet(order: &Order, source_name: &str, destination_name: &str) -> String {
    let mut rows = String::new();
    for line in &order.items {
        let _ = write!(
            rows,
            r#"      <tr>
        <td class="name">{}</td>
        <td class="num">{}</td>
        <td class="unit">{}</td>
        <td class="num">{}</td>
        <td class="num">{}</td>
      </tr>
"#,
            escape_html(&line.item_name),
            line.quantity,
            escape_html(&line.unit),
            format_yen(line.price),
            format_yen(line.line_total()),
        );
    }
    for _ in order.items.len()..MIN_ITEM_ROWS {
        rows.push_str(
            "      <tr><td class=\"name\">&nbsp;</td><td></td><td></td><td></td><td></td></tr>\n",
        );
    }

    let delivery = order
        .desired_delivery_date
        .map(|d| d.format("%Y年%m月%d日").to_string())
        .unwrap_or_else(|| "指定なし".to_string());
    let remarks = match order.remarks.as_deref() {
        Some(r) if !r.trim().is_empty() => escape_html(r),
        _ => "特になし".to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="utf-8">
<title>資材発注書 {order_id}</title>
<style>
  body {{ font-family: "Hiragino Kaku Gothic ProN", "Yu Gothic", sans-serif; margin: 2rem auto; max-width: 720px; color: #222; }}
  h1 {{ text-align: center; letter-spacing: 0.5em; border-bottom: 3px double #222; padding-bottom: 0.4rem; }}
  .meta {{ display: flex; justify-content: space-between; margin: 1.2rem 0; }}
  .party {{ font-size: 1.2rem; border-bottom: 1px solid #222; padding: 0.3rem 2rem 0.3rem 0; }}
  .company {{ text-align: right; font-size: 0.9rem; line-height: 1.5; }}
  table {{ width: 100%; border-collapse: collapse; margin-top: 1rem; }}
  th, td {{ border: 1px solid #222; padding: 0.4rem 0.6rem; }}
  th {{ background: #eee; }}
  td.num {{ text-align: right; white-space: nowrap; }}
  td.unit {{ text-align: center; }}
  .total {{ margin-top: 1rem; text-align: right; font-size: 1.1rem; font-weight: bold; }}
  .remarks {{ margin-top: 1.5rem; border: 1px solid #222; padding: 0.6rem; min-height: 3rem; }}
  @media print {{ body {{ margin: 0; }} }}
</style>
</head>
<body>
  <h1>資材発注書</h1>
  <div class="meta">
    <div>
      <div class="party">{destination} 御中</div>
      <p>下記の通り発注いたします。</p>
      <p>発注番号: {order_id}<br>発注日: {order_date}<br>発注元: {source}<br>希望納品日: {delivery}</p>
    </div>
    <div class="company">
      {company_name}<br>
      {company_postal}<br>
      {company_address}<br>
      {company_tel}
    </div>
  </div>
  <table>
    <thead>
      <tr><th>品名</th><th>数量</th><th>単位</th><th>単価</th><th>金額</th></tr>
    </thead>
    <tbody>
{rows}    </tbody>
  </table>
  <div class="total">合計金額（税込）: {total}</div>
  <div class="remarks"><strong>備考:</strong> {remarks}</div>
</body>
</html>
"#,
        order_id = escape_html(&order.id),
        order_date = order.date.format("%Y年%m月%d日"),
        destination = escape_html(destination_name),
        source = escape_html(source_name),
        delivery = delivery,
        company_name = COMPANY_NAME,
        company_postal = COMPANY_POSTAL,
        company_address = COMPANY_ADDRESS,
        company_tel = COMPANY_TEL,
        rows = rows,
        total = format_yen(order.total_amount),
        remarks = remarks,
    )
}

fn format_yen(amount: Decimal) -> String {
    let normalized = amount.normalize();
    let text = normalized.to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part.as_str()),
    };

    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    match frac_part {
        Some(f) => format!("¥{}{}.{}", sign, grouped, f),
        None => format!("¥{}{}", sign, grouped),
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use crate::models::{OrderItem, OrderStatus};

    fn sample_order() -> Order {
        Order {
            id: "ORD-20240101-abc123".into(),
            date: Utc::now(),
            source_id: "S001".into(),
            destination_id: "F001".into(),
            items: vec![OrderItem {
                item_id: "I0001".into(),
                item_name: "ハンガー <白>".into(),
                quantity: 100,
                unit: "本".into(),
                price: dec!(15),
            }],
            total_amount: dec!(1500),
            status: OrderStatus::Pending,
            desired_delivery_date: None,
            remarks: None,
        }
    }

    #[test]
    fn formats_yen_with_thousands_separator() {
        assert_eq!(format_yen(dec!(0)), "¥0");
        assert_eq!(format_yen(dec!(1500)), "¥1,500");
        assert_eq!(format_yen(dec!(1234567)), "¥1,234,567");
        assert_eq!(format_yen(dec!(12.5)), "¥12.5");
    }

    #[test]
    fn escapes_markup_in_item_names() {
        let html = render_sheet(&sample_order(), "山手本店", "福山工場");
        assert!(html.contains("ハンガー &lt;白&gt;"));
        assert!(!html.contains("ハンガー <白>"));
    }

    #[test]
    fn pads_item_table_to_minimum_rows() {
        let html = render_sheet(&sample_order(), "山手本店", "福山工場");
        assert_eq!(html.matches("<tr>").count() - 1, MIN_ITEM_ROWS);
    }

    #[test]
    fn empty_remarks_render_placeholder() {
        let html = render_sheet(&sample_order(), "山手本店", "福山工場");
        assert!(html.contains("特になし"));
        assert!(html.contains("合計金額（税込）: ¥1,500"));
    }
}
