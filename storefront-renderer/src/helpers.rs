//! Shared template helpers registered on every engine instance.
//!
//! | Filter     | Usage                          | Output                      |
//! |------------|--------------------------------|-----------------------------|
//! | `markdown` | `{{ post.body \| markdown }}`  | HTML (raw HTML passes)      |
//! | `money`    | `{{ product.price \| money }}` | `$12.50` with store symbol  |

use std::collections::HashMap;

use tera::{Tera, Value};

use storefront_core::StoreFormat;

/// Markdown → HTML. Output is marked safe so autoescaping leaves it alone.
pub struct MarkdownFilter;

impl tera::Filter for MarkdownFilter {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        let source = match value {
            Value::Null => return Ok(Value::String(String::new())),
            Value::String(s) => s.as_str(),
            other => return Err(tera::Error::msg(format!("markdown expects a string, got {other}"))),
        };
        let mut options = comrak::Options::default();
        options.render.r#unsafe = true;
        Ok(Value::String(comrak::markdown_to_html(source, &options)))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

/// Formats a price with the store currency symbol and two decimals.
///
/// `symbol` overrides the configured symbol: `{{ 10 | money(symbol="€") }}`.
pub struct MoneyFilter {
    symbol: String,
}

impl MoneyFilter {
    pub fn new(format: &StoreFormat) -> Self {
        MoneyFilter {
            symbol: format.currency_symbol.clone(),
        }
    }
}

impl tera::Filter for MoneyFilter {
    fn filter(&self, value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let amount = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(|| tera::Error::msg(format!("money expects a number, got {value}")))?;
        let symbol = args
            .get("symbol")
            .and_then(Value::as_str)
            .unwrap_or(self.symbol.as_str());
        let sign = if amount < 0.0 { "-" } else { "" };
        Ok(Value::String(format!("{sign}{symbol}{:.2}", amount.abs())))
    }
}

/// Register the shared filters on `tera`.
pub fn register(tera: &mut Tera, format: &StoreFormat) {
    tera.register_filter("markdown", MarkdownFilter);
    tera.register_filter("money", MoneyFilter::new(format));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tera::{Context, Filter};

    fn no_args() -> HashMap<String, Value> {
        HashMap::new()
    }

    #[test]
    fn markdown_renders_html() {
        let out = MarkdownFilter
            .filter(&Value::String("# Hello\n\n*there*".into()), &no_args())
            .expect("filter");
        let html = out.as_str().expect("string");
        assert!(html.contains("<h1>Hello</h1>"), "got: {html}");
        assert!(html.contains("<em>there</em>"), "got: {html}");
    }

    #[test]
    fn markdown_keeps_raw_html() {
        let out = MarkdownFilter
            .filter(&Value::String("<div class=\"x\">hi</div>".into()), &no_args())
            .expect("filter");
        assert!(out.as_str().unwrap().contains("<div class=\"x\">hi</div>"));
    }

    #[test]
    fn markdown_output_is_not_escaped() {
        let mut tera = Tera::default();
        register(&mut tera, &StoreFormat::default());
        tera.add_raw_template("page.html", "{{ body | markdown }}").unwrap();
        let mut ctx = Context::new();
        ctx.insert("body", "**bold**");
        let out = tera.render("page.html", &ctx).expect("render");
        assert!(out.contains("<strong>bold</strong>"), "got: {out}");
    }

    #[test]
    fn money_uses_store_symbol() {
        let filter = MoneyFilter::new(&StoreFormat {
            currency_symbol: "R$".into(),
            ..StoreFormat::default()
        });
        let out = filter.filter(&serde_json::json!(12.5), &no_args()).unwrap();
        assert_eq!(out, Value::String("R$12.50".into()));
        let out = filter.filter(&serde_json::json!("-3"), &no_args()).unwrap();
        assert_eq!(out, Value::String("-R$3.00".into()));
    }

    #[test]
    fn money_symbol_override_and_bad_input() {
        let filter = MoneyFilter::new(&StoreFormat::default());
        let mut args = no_args();
        args.insert("symbol".into(), Value::String("€".into()));
        assert_eq!(
            filter.filter(&serde_json::json!(1), &args).unwrap(),
            Value::String("€1.00".into())
        );
        assert!(filter.filter(&serde_json::json!([1]), &no_args()).is_err());
    }
}
