use thiserror::Error;
use tracing::error;

use crate::domain::models::InvoiceRow;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("invoice has no value for {0}")]
    MissingField(&'static str),
    #[error("unknown placeholder {{{0}}}")]
    UnknownPlaceholder(String),
    #[error("unbalanced brace at byte {0}")]
    UnbalancedBrace(usize),
}

/// Fills `{name}`, `{amount}`, `{due_date}` and `{payment_link}` from an
/// invoice. `{{` and `}}` produce literal braces.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageRenderer;

impl MessageRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Falls back to the raw template when substitution fails.
    pub fn render(&self, template: &str, invoice: &InvoiceRow) -> String {
        match self.try_render(template, invoice) {
            Ok(message) => message,
            Err(err) => {
                error!(
                    invoice_id = %invoice.id,
                    customer = %invoice.customer_name,
                    error = %err,
                    "failed to render message, sending template as is"
                );
                template.to_string()
            }
        }
    }

    pub fn try_render(&self, template: &str, invoice: &InvoiceRow) -> Result<String, RenderError> {
        let mut out = String::with_capacity(template.len() + 64);
        let mut rest = template;
        let mut offset = 0;

        while let Some(pos) = rest.find(['{', '}']) {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            if tail.starts_with("{{") {
                out.push('{');
                rest = &tail[2..];
                offset += pos + 2;
            } else if tail.starts_with("}}") {
                out.push('}');
                rest = &tail[2..];
                offset += pos + 2;
            } else if tail.starts_with('}') {
                return Err(RenderError::UnbalancedBrace(offset + pos));
            } else {
                let close = tail
                    .find('}')
                    .ok_or(RenderError::UnbalancedBrace(offset + pos))?;
                let key = &tail[1..close];
                out.push_str(&self.field(key, invoice)?);
                rest = &tail[close + 1..];
                offset += pos + close + 1;
            }
        }
        out.push_str(rest);
        Ok(out)
    }

    fn field(&self, key: &str, invoice: &InvoiceRow) -> Result<String, RenderError> {
        match key {
            "name" => Ok(invoice.customer_name.clone()),
            "amount" => Ok(format!("{:.2}", invoice.total.round_dp(2))),
            "due_date" => Ok(invoice.due_date.format("%d/%m/%Y").to_string()),
            "payment_link" => invoice
                .payment_link
                .clone()
                .ok_or(RenderError::MissingField("payment_link")),
            other => Err(RenderError::UnknownPlaceholder(other.to_string())),
        }
    }
}
