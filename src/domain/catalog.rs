//! Fixed dunning schedule: which message goes out at which point of an
//! invoice's life.
//!
//! Templates use four placeholders, `{name}`, `{amount}`, `{due_date}` and
//! `{payment_link}`, filled in by the message renderer.

use crate::domain::{errors::DomainError, models::PeriodCode};

pub const UNKNOWN_PERIOD_DESCRIPTION: &str = "Unknown period";

pub const PLACEHOLDERS: [&str; 4] = ["{name}", "{amount}", "{due_date}", "{payment_link}"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub period: PeriodCode,
    pub message: &'static str,
    pub description: &'static str,
}

const TEMPLATES: [Template; 6] = [
    Template {
        period: PeriodCode::BeforeDue(3),
        message: "Oi {name}, tudo certo por aí?\n\n\
🔔 Passando só pra lembrar que o boleto da Turbo vence em 3 dias:\n\
💰 Valor: R$ {amount}\n\
📅 Vencimento: {due_date}\n\n\
Qualquer dúvida, estamos por aqui 👊\n\n\
🔗 {payment_link}\n\n\
Obrigado pela parceria de sempre! 🚀\n\
— Time Financeiro | Turbo Partners",
        description: "Reminder 3 days before the due date",
    },
    Template {
        period: PeriodCode::DueToday,
        message: "Oi {name}, tudo certo?\n\n\
⏰ Passando aqui só pra avisar que o boleto da Turbo vence hoje:\n\
💰 Valor: R$ {amount}\n\
📅 Vencimento: {due_date}\n\n\
Segue o link pra facilitar:\n\
🔗 {payment_link}\n\n\
Qualquer coisa, é só chamar por aqui 👍\n\
— Time Financeiro | Turbo Partners",
        description: "Notice on the due date",
    },
    Template {
        period: PeriodCode::Overdue(1),
        message: "Oi {name}, tudo certo?\n\n\
⚠️ Ontem venceu o boleto da Turbo e ainda não localizamos o pagamento:\n\
💰 Valor: R$ {amount}\n\
📅 Vencimento: {due_date}\n\n\
Caso já tenha pago, é só nos enviar o comprovante por aqui.\n\n\
Se ainda não conseguiu, segue o link:\n\
🔗 {payment_link}\n\n\
⚡ Importante: caso a pendência não seja regularizada até o 7º dia após o vencimento, \
os serviços serão pausados automaticamente.\n\n\
Qualquer dúvida, estamos à disposição.\n\
— Time Financeiro | Turbo Partners",
        description: "First overdue notice",
    },
    Template {
        period: PeriodCode::Overdue(7),
        message: "Oi {name}, tudo certo?\n\n\
🚫 O boleto da Turbo segue em aberto há 7 dias e os serviços estão sendo pausados temporariamente:\n\
💰 Valor: R$ {amount}\n\
📅 Vencimento: {due_date}\n\n\
Caso já tenha feito o pagamento, é só nos enviar o comprovante para reativarmos as entregas.\n\n\
Link do boleto:\n\
🔗 {payment_link}\n\n\
Qualquer dúvida, seguimos à disposição.\n\
— Time Financeiro | Turbo Partners",
        description: "Service suspension",
    },
    Template {
        period: PeriodCode::Overdue(14),
        message: "Oi {name}, tudo certo?\n\n\
⚖️ O boleto da Turbo segue em aberto há 14 dias:\n\
💰 Valor: R$ {amount}\n\
📅 Vencimento: {due_date}\n\n\
Conforme previsto contratualmente, o serviço já está pausado. Caso o pagamento não seja \
regularizado nos próximos 7 dias, o contrato será rescindido por justa causa, com início \
imediato do processo de cobrança judicial.\n\n\
Ainda há tempo para resolver de forma amigável:\n\
🔗 {payment_link}\n\n\
Ficamos no aguardo de uma posição.\n\
— Time Financeiro | Turbo Partners",
        description: "Pre-litigation warning",
    },
    Template {
        period: PeriodCode::Overdue(21),
        message: "Prezado(a) {name},\n\n\
⚖️ Comunicamos que, diante da inadimplência do boleto vencido em {due_date}, no valor de \
R$ {amount}, e transcorridos 21 dias sem regularização, o contrato firmado com a Turbo \
Partners encontra-se rescindido por justa causa.\n\n\
Informamos que os serviços foram encerrados em caráter definitivo, e o processo de cobrança \
judicial foi instaurado para a recuperação integral dos valores em aberto, acrescidos de \
multa, juros legais e honorários advocatícios.\n\n\
Link do boleto para regularização:\n\
🔗 {payment_link}\n\n\
Em caso de dúvidas ou negociação formal, estamos à disposição para redirecionar a tratativa \
ao nosso setor jurídico.\n\n\
Atenciosamente,\n\
Departamento Financeiro | Turbo Partners",
        description: "Litigation notice",
    },
];

/// Read-only view over the dunning schedule.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateCatalog;

impl TemplateCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Exact match on the catalog spelling of the code.
    pub fn get(&self, code: &str) -> Option<&'static Template> {
        TEMPLATES.iter().find(|t| t.period.to_string() == code)
    }

    pub fn get_message(&self, code: &str) -> Result<&'static str, DomainError> {
        self.get(code)
            .map(|t| t.message)
            .ok_or_else(|| DomainError::NotFound(code.to_string()))
    }

    /// Never fails; unknown codes get a generic description.
    pub fn get_description(&self, code: &str) -> &'static str {
        self.get(code)
            .map(|t| t.description)
            .unwrap_or(UNKNOWN_PERIOD_DESCRIPTION)
    }

    /// Periods in schedule order, which is also the "run all" order.
    pub fn list_periods(&self) -> Vec<PeriodCode> {
        TEMPLATES.iter().map(|t| t.period).collect()
    }

    pub fn templates(&self) -> &'static [Template] {
        &TEMPLATES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_periods_in_schedule_order() {
        let codes: Vec<String> = TemplateCatalog::new()
            .list_periods()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(codes, ["D-3", "D+0", "D+1", "D+7", "D+14", "D+21"]);
    }

    #[test]
    fn every_template_carries_all_placeholders() {
        let catalog = TemplateCatalog::new();
        for period in catalog.list_periods() {
            let message = catalog.get_message(&period.to_string()).unwrap();
            assert!(!message.is_empty());
            for placeholder in PLACEHOLDERS {
                assert!(message.contains(placeholder), "{period} lacks {placeholder}");
            }
        }
    }

    #[test]
    fn unknown_code_fails_message_lookup_but_not_description() {
        let catalog = TemplateCatalog::new();
        assert!(matches!(catalog.get_message("D+2"), Err(DomainError::NotFound(code)) if code == "D+2"));
        assert!(matches!(catalog.get_message("bogus"), Err(DomainError::NotFound(_))));
        assert_eq!(catalog.get_description("D+2"), UNKNOWN_PERIOD_DESCRIPTION);
        assert_eq!(catalog.get_description("D+7"), "Service suspension");
    }

    #[test]
    fn lookup_requires_the_exact_catalog_spelling() {
        let catalog = TemplateCatalog::new();
        for code in ["D-0", "D+07", " D+7", "D+7 ", "d+7", "D-03"] {
            assert!(catalog.get(code).is_none(), "{code:?} resolved");
            assert!(matches!(catalog.get_message(code), Err(DomainError::NotFound(_))));
            assert_eq!(catalog.get_description(code), UNKNOWN_PERIOD_DESCRIPTION);
        }
        assert!(catalog.get("D+7").is_some());
    }
}
