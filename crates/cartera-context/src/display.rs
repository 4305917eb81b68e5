//! Render records as the text blocks the assistant reads.
//!
//! Only well-known columns are rendered, always in the same order, one line
//! per non-empty column. Unknown columns are left out. Rendering is pure.

use cartera_core::Record;

/// Placed between rendered records in a multi-record block.
pub const RECORD_SEPARATOR: &str = "\n\n---\n\n";

/// `ESTATUS_CM` value that marks a lot as sold.
pub const SOLD: &str = "VENDIDO";

#[derive(Clone, Copy)]
enum Kind {
  Text,
  Currency,
}

struct Line {
  field: &'static str,
  label: &'static str,
  kind:  Kind,
}

const fn text(field: &'static str, label: &'static str) -> Line {
  Line { field, label, kind: Kind::Text }
}

const fn money(field: &'static str, label: &'static str) -> Line {
  Line { field, label, kind: Kind::Currency }
}

const LINES: &[Line] = &[
  // identity
  text("LLAVE", "🔑 Llave"),
  text("CLIENTE", "👤 Cliente"),
  text("RFC", "📄 RFC"),
  // property
  text("LOTE", "🏠 Lote"),
  text("CONDOMINIO", "🏘️ Condominio"),
  text("DESARROLLO", "🏗️ Desarrollo"),
  text("M2", "📐 M²"),
  text("TIPO_LOTE", "🏷️ Tipo de Lote"),
  // contact
  text("TELEFONO", "📞 Teléfono"),
  text("CORREO", "📧 Correo"),
  // financial
  money("TOTAL_OPERACION", "💰 Total Operación"),
  money("ENGANCHE", "💵 Enganche"),
  money("PAGADO", "✅ Pagado"),
  money("DEUDA", "⚠️ Deuda"),
  // payment plan
  text("TOTAL_MENSUALIDADES", "📅 Total Mensualidades"),
];

/// Render one record. A record with none of the known columns renders to
/// the empty string.
pub fn render(record: &Record) -> String {
  let mut lines: Vec<String> = LINES
    .iter()
    .filter_map(|line| {
      let value = record.get_non_empty(line.field)?;
      match line.kind {
        Kind::Text => Some(format!("{}: {value}", line.label)),
        Kind::Currency => parse_amount(value)
          .map(|amount| format!("{}: {}", line.label, format_currency(amount))),
      }
    })
    .collect();

  if let Some(status) = record.get_non_empty("ESTATUS_CM") {
    let marker = if status == SOLD { "✅" } else { "⏳" };
    lines.push(format!("{marker} Estatus: {status}"));
  }
  if let Some(state) = record.get_non_empty("ESTATUS") {
    lines.push(format!("📊 Estado: {state}"));
  }

  lines.join("\n")
}

// ─── Amounts ─────────────────────────────────────────────────────────────────

/// Parse a spreadsheet amount: thousands separators (`,`) are dropped, then
/// the longest leading decimal number is read, so `"1,200.50 MXN"` is
/// `1200.5`. Returns `None` when no number leads the value.
pub fn parse_amount(raw: &str) -> Option<f64> {
  let cleaned: String = raw.chars().filter(|&c| c != ',').collect();
  let s = cleaned.trim_start();
  let bytes = s.as_bytes();

  let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
  let int_digits = count_digits(&bytes[end..]);
  end += int_digits;

  let mut frac_digits = 0;
  if bytes.get(end) == Some(&b'.') {
    frac_digits = count_digits(&bytes[end + 1..]);
    end += 1 + frac_digits;
  }
  if int_digits + frac_digits == 0 {
    return None;
  }

  if matches!(bytes.get(end), Some(b'e' | b'E')) {
    let mut exp = end + 1;
    if matches!(bytes.get(exp), Some(b'+' | b'-')) {
      exp += 1;
    }
    let exp_digits = count_digits(&bytes[exp..]);
    if exp_digits > 0 {
      end = exp + exp_digits;
    }
  }

  s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

fn count_digits(bytes: &[u8]) -> usize {
  bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Format pesos the es-MX way: `$1,234.50`, `-$80.00`.
pub fn format_currency(amount: f64) -> String {
  let fixed = format!("{:.2}", amount.abs());
  let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
  let is_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
  let sign = if amount < 0.0 && !is_zero { "-" } else { "" };
  format!("{sign}${}.{frac}", group_thousands(int))
}

fn group_thousands(digits: &str) -> String {
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  out
}
