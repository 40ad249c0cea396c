use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::constants::MAX_TICKETS_PER_ACCOUNT;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};

/// Sets aside one or more sequence numbers as Tickets.
///
/// See TicketCreate:
/// `<https://xrpl.org/ticketcreate.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct TicketCreate<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// How many Tickets to create. Must be positive and cannot push
    /// the account past the per-account limit.
    pub ticket_count: u32,
}

impl<'a> Model for TicketCreate<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if self.ticket_count == 0 {
            return Err(XRPLModelException::ValueTooLow {
                field: "ticket_count".to_string(),
                min: 1,
                found: 0,
            });
        }
        if self.ticket_count > MAX_TICKETS_PER_ACCOUNT {
            return Err(XRPLModelException::ValueTooHigh {
                field: "ticket_count".to_string(),
                max: MAX_TICKETS_PER_ACCOUNT,
                found: self.ticket_count,
            });
        }
        Ok(())
    }
}

impl<'a> Transaction<'a, NoFlags> for TicketCreate<'a> {
    fn get_transaction_type(&self) -> &TransactionType {
        self.common_fields.get_transaction_type()
    }

    fn get_common_fields(&self) -> &CommonFields<'_, NoFlags> {
        self.common_fields.get_common_fields()
    }

    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        self.common_fields.get_mut_common_fields()
    }
}

impl<'a> CommonTransactionBuilder<'a, NoFlags> for TicketCreate<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> TicketCreate<'a> {
    pub fn new(account: Cow<'a, str>, ticket_count: u32) -> Self {
        TicketCreate {
            common_fields: CommonFields::from_account(account, TransactionType::TicketCreate),
            ticket_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_count_bounds() {
        let account = "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb";

        assert!(TicketCreate::new(account.into(), 0)
            .with_sequence(1)
            .validate()
            .is_err());
        assert!(TicketCreate::new(account.into(), 251)
            .with_sequence(1)
            .validate()
            .is_err());
        assert!(TicketCreate::new(account.into(), 250)
            .with_sequence(1)
            .validate()
            .is_ok());
    }
}
