//! # Invoicing
//!
//! Turns contract consumptions into draft invoices.
//!
//! ## Invoicing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  consumptions ──► resolve line + contract ──► InvoiceLine               │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │                                   annotate_invoice_line()               │
//! │                                   "Hosting BONIFICACIÓN 20%"            │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │  group by (contract, party, invoice date) ──► Vec<Invoice>              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use discount_core::validation::validate_entity_id;
use discount_core::{
    annotate_invoice_line, Contract, ContractConsumption, ContractLine, DiscountSources, Invoice,
    InvoiceLine, PricingConfig,
};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::DiscountConfig;
use crate::error::{HookError, HookResult};

/// Grouping key of one invoice.
type InvoiceKey = (String, String, NaiveDate);

/// Builds invoices from consumptions.
#[derive(Debug, Clone, Default)]
pub struct Invoicer {
    config: PricingConfig,
}

impl Invoicer {
    pub fn new(config: PricingConfig) -> Self {
        Invoicer { config }
    }

    pub fn from_config(config: &DiscountConfig) -> Self {
        Self::new(config.pricing.clone())
    }

    /// Builds the annotated invoice line of one consumption.
    ///
    /// Quantity comes from the consumption; description and net price from
    /// the contract line. A line without a net price bills at 0.
    pub fn invoice_line(
        &self,
        consumption: &ContractConsumption,
        line: &ContractLine,
        contract: &Contract,
    ) -> HookResult<InvoiceLine> {
        if let Some(line_contract) = line.contract_id.as_deref() {
            if line_contract != consumption.contract_id {
                return Err(HookError::ContractMismatch {
                    consumption_id: consumption.id.clone(),
                    expected: consumption.contract_id.clone(),
                    actual: line_contract.to_string(),
                });
            }
        }

        let mut invoice_line = InvoiceLine {
            consumption_id: consumption.id.clone(),
            description: line.description.clone(),
            quantity: consumption.quantity,
            unit_price: line.unit_price.unwrap_or(Decimal::ZERO),
            gross_unit_price: line.gross_unit_price,
            discount: line.discount,
        };

        let contract_discount = DiscountSources::from_contract(contract).resolve(line);
        if annotate_invoice_line(&mut invoice_line, line, contract_discount, &self.config) {
            debug!(
                consumption_id = %consumption.id,
                description = %invoice_line.description,
                "Annotated invoice line with discount"
            );
        }

        Ok(invoice_line)
    }

    /// Invoices every consumption, one invoice per contract, party and date.
    ///
    /// Invoices come out ordered by contract id then invoice date; lines keep
    /// the order of `consumptions`.
    pub fn invoice_consumptions(
        &self,
        consumptions: &[ContractConsumption],
        lines: &[ContractLine],
        contracts: &[Contract],
    ) -> HookResult<Vec<Invoice>> {
        let lines: HashMap<&str, &ContractLine> =
            lines.iter().map(|l| (l.id.as_str(), l)).collect();
        let contracts: HashMap<&str, &Contract> =
            contracts.iter().map(|c| (c.id.as_str(), c)).collect();

        let mut groups: BTreeMap<InvoiceKey, Vec<InvoiceLine>> = BTreeMap::new();
        for consumption in consumptions {
            validate_entity_id("consumption_id", &consumption.id)?;
            validate_entity_id("contract_line_id", &consumption.contract_line_id)?;
            validate_entity_id("contract_id", &consumption.contract_id)?;

            let line_id = consumption.contract_line_id.as_str();
            let line = lines
                .get(line_id)
                .ok_or_else(|| HookError::UnknownContractLine(line_id.to_string()))?;
            let contract = contracts
                .get(consumption.contract_id.as_str())
                .ok_or_else(|| HookError::UnknownContract(consumption.contract_id.clone()))?;

            let invoice_line = self.invoice_line(consumption, line, contract)?;
            groups
                .entry((
                    contract.id.clone(),
                    contract.party_id.clone(),
                    consumption.invoice_date,
                ))
                .or_default()
                .push(invoice_line);
        }

        let invoices: Vec<Invoice> = groups
            .into_iter()
            .map(|((contract_id, party_id, invoice_date), lines)| Invoice {
                id: uuid::Uuid::new_v4().to_string(),
                contract_id,
                party_id,
                invoice_date,
                lines,
            })
            .collect();

        info!(
            consumptions = consumptions.len(),
            invoices = invoices.len(),
            "Invoiced contract consumptions"
        );
        Ok(invoices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use discount_core::{CoreError, Discount, ValidationError};
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn consumption(
        line: &ContractLine,
        contract: &Contract,
        qty: Decimal,
        day: u32,
    ) -> ContractConsumption {
        ContractConsumption {
            id: uuid::Uuid::new_v4().to_string(),
            contract_line_id: line.id.clone(),
            contract_id: contract.id.clone(),
            start_date: date(1),
            end_date: date(day),
            invoice_date: date(day),
            quantity: qty,
        }
    }

    fn priced_line(
        contract: &Contract,
        gross: Decimal,
        discount: Decimal,
        unit: Decimal,
    ) -> ContractLine {
        let mut line = ContractLine::new("Hosting")
            .with_contract(contract)
            .with_gross_unit_price(gross)
            .with_discount(Discount::new(discount));
        line.unit_price = Some(unit);
        line
    }

    #[test]
    fn test_invoice_line_is_annotated() {
        let mut contract = Contract::new("party-1");
        contract.contract_discount = Discount::new(dec!(0.20));
        let line = priced_line(&contract, dec!(50.00), dec!(0), dec!(40.00));

        let invoice_line = Invoicer::default()
            .invoice_line(&consumption(&line, &contract, dec!(3), 31), &line, &contract)
            .unwrap();

        assert_eq!(invoice_line.description, "Hosting BONIFICACIÓN 20%");
        assert_eq!(invoice_line.quantity, dec!(3));
        assert_eq!(invoice_line.unit_price, dec!(40.00));
        assert_eq!(invoice_line.gross_unit_price, Some(dec!(40.00)));
        assert!(invoice_line.discount.is_zero());
        assert_eq!(invoice_line.amount().unwrap(), dec!(120.00));
    }

    #[test]
    fn test_undiscounted_line_is_not_annotated() {
        let contract = Contract::new("party-1");
        let line = priced_line(&contract, dec!(40), dec!(0), dec!(40));
        let invoice_line = Invoicer::default()
            .invoice_line(&consumption(&line, &contract, dec!(1), 31), &line, &contract)
            .unwrap();
        assert_eq!(invoice_line.description, "Hosting");
        assert_eq!(invoice_line.gross_unit_price, Some(dec!(40)));
    }

    #[test]
    fn test_contract_mismatch() {
        let contract = Contract::new("party-1");
        let other = Contract::new("party-1");
        let line = priced_line(&other, dec!(10), dec!(0), dec!(10));
        let result = Invoicer::default().invoice_line(
            &consumption(&line, &contract, dec!(1), 31),
            &line,
            &contract,
        );
        assert!(matches!(result, Err(HookError::ContractMismatch { .. })));
    }

    #[test]
    fn test_grouping_by_contract_and_date() {
        let invoicer = Invoicer::default();
        let a = Contract::new("party-a");
        let b = Contract::new("party-b");
        let line_a = priced_line(&a, dec!(100), dec!(0.10), dec!(90));
        let line_b = priced_line(&b, dec!(20), dec!(0), dec!(20));

        let consumptions = vec![
            consumption(&line_a, &a, dec!(1), 15),
            consumption(&line_b, &b, dec!(2), 15),
            consumption(&line_a, &a, dec!(1), 15),
            consumption(&line_a, &a, dec!(1), 31),
        ];

        let invoices = invoicer
            .invoice_consumptions(
                &consumptions,
                &[line_a.clone(), line_b],
                &[a.clone(), b.clone()],
            )
            .unwrap();

        assert_eq!(invoices.len(), 3);
        let for_a: Vec<&Invoice> = invoices.iter().filter(|i| i.contract_id == a.id).collect();
        assert_eq!(for_a.len(), 2);
        assert_eq!(for_a[0].invoice_date, date(15));
        assert_eq!(for_a[0].lines.len(), 2);
        assert_eq!(for_a[0].untaxed_amount().unwrap(), dec!(180));
        assert_eq!(for_a[0].lines[0].description, "Hosting BONIFICACIÓN 10%");
        assert_eq!(for_a[1].invoice_date, date(31));

        let for_b = invoices.iter().find(|i| i.contract_id == b.id).unwrap();
        assert_eq!(for_b.party_id, "party-b");
        assert_eq!(for_b.untaxed_amount().unwrap(), dec!(40));
    }

    #[test]
    fn test_unknown_references() {
        let invoicer = Invoicer::default();
        let contract = Contract::new("party-1");
        let line = priced_line(&contract, dec!(10), dec!(0), dec!(10));
        let c = consumption(&line, &contract, dec!(1), 31);

        assert!(matches!(
            invoicer.invoice_consumptions(&[c.clone()], &[], &[contract.clone()]),
            Err(HookError::UnknownContractLine(_))
        ));
        assert!(matches!(
            invoicer.invoice_consumptions(&[c], &[line], &[]),
            Err(HookError::UnknownContract(_))
        ));
    }

    #[test]
    fn test_malformed_references_are_rejected() {
        let invoicer = Invoicer::default();
        let contract = Contract::new("party-1");
        let line = priced_line(&contract, dec!(10), dec!(0), dec!(10));

        let mut blank = consumption(&line, &contract, dec!(1), 31);
        blank.contract_line_id = String::new();
        assert!(matches!(
            invoicer.invoice_consumptions(&[blank], &[line.clone()], &[contract.clone()]),
            Err(HookError::Core(CoreError::Validation(ValidationError::Required { .. })))
        ));

        let mut malformed = consumption(&line, &contract, dec!(1), 31);
        malformed.id = "consumption-1".to_string();
        assert!(matches!(
            invoicer.invoice_consumptions(&[malformed], &[line], &[contract]),
            Err(HookError::Core(CoreError::Validation(ValidationError::InvalidFormat { .. })))
        ));
    }
}
