use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::builder::check_limits;
use super::error::{EtsError, join_errors};
use super::types::*;
use super::validation;

/// Builder for e-Müstahsil producer receipts.
///
/// ```
/// use ets::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let receipt = ProducerReceiptBuilder::new(NaiveDate::from_ymd_opt(2024, 9, 2).unwrap())
///     .issuer(PartyBuilder::new("Hal Ticaret A.Ş.", "1234567890", AddressBuilder::new("Antalya").build()).build())
///     .producer(PartyBuilder::new("Mehmet Kaya", "10000000146", AddressBuilder::new("Antalya").build())
///         .person("Mehmet", "Kaya")
///         .build())
///     .add_line(ReceiptLineBuilder::new("1", "Domates", dec!(1000), "KGM", dec!(12.50))
///         .withholding_rate(dec!(2))
///         .build())
///     .build()
///     .unwrap();
/// assert_eq!(receipt.totals.unwrap().net_payable, dec!(12250.00));
/// ```
pub struct ProducerReceiptBuilder {
    uuid: Option<Uuid>,
    number: Option<String>,
    issue_date: NaiveDate,
    issue_time: Option<NaiveTime>,
    issuer: Option<Party>,
    producer: Option<Party>,
    lines: Vec<ReceiptLine>,
    delivery_reference: Option<DocumentReference>,
    notes: Vec<String>,
}

impl ProducerReceiptBuilder {
    pub fn new(issue_date: NaiveDate) -> Self {
        Self {
            uuid: None,
            number: None,
            issue_date,
            issue_time: None,
            issuer: None,
            producer: None,
            lines: Vec::new(),
            delivery_reference: None,
            notes: Vec::new(),
        }
    }

    pub fn uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = Some(uuid);
        self
    }

    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn issue_time(mut self, time: NaiveTime) -> Self {
        self.issue_time = Some(time);
        self
    }

    pub fn issuer(mut self, party: Party) -> Self {
        self.issuer = Some(party);
        self
    }

    pub fn producer(mut self, party: Party) -> Self {
        self.producer = Some(party);
        self
    }

    pub fn add_line(mut self, line: ReceiptLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn delivery_reference(mut self, id: impl Into<String>, date: Option<NaiveDate>) -> Self {
        self.delivery_reference = Some(DocumentReference {
            id: id.into(),
            issue_date: date,
        });
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    fn assemble(self) -> Result<ProducerReceipt, EtsError> {
        let issuer = self
            .issuer
            .ok_or_else(|| EtsError::Builder("issuer is required".into()))?;
        let producer = self
            .producer
            .ok_or_else(|| EtsError::Builder("producer is required".into()))?;

        Ok(ProducerReceipt {
            uuid: self.uuid.unwrap_or_else(Uuid::new_v4),
            number: self.number,
            issue_date: self.issue_date,
            issue_time: self.issue_time,
            issuer,
            producer,
            lines: self.lines,
            delivery_reference: self.delivery_reference,
            notes: self.notes,
            totals: None,
        })
    }

    /// Build the receipt, calculating totals and running validation.
    pub fn build(self) -> Result<ProducerReceipt, EtsError> {
        if self.lines.is_empty() {
            return Err(EtsError::Builder(
                "at least one receipt line is required".into(),
            ));
        }
        check_limits(self.lines.len(), self.notes.len())?;

        let mut receipt = self.assemble()?;
        validation::calculate_receipt_totals(&mut receipt);

        let errors = validation::validate_producer_receipt(&receipt);
        if !errors.is_empty() {
            return Err(join_errors(&errors));
        }
        Ok(receipt)
    }

    /// Build without validation.
    pub fn build_unchecked(self) -> Result<ProducerReceipt, EtsError> {
        let mut receipt = self.assemble()?;
        validation::calculate_receipt_totals(&mut receipt);
        Ok(receipt)
    }
}

/// Builder for ReceiptLine. Withholding (stopaj) defaults to 2%.
pub struct ReceiptLineBuilder {
    id: String,
    name: String,
    quantity: Decimal,
    unit: String,
    unit_price: Decimal,
    withholding_rate: Decimal,
}

impl ReceiptLineBuilder {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            unit: unit.into(),
            unit_price,
            withholding_rate: Decimal::new(2, 0),
        }
    }

    pub fn withholding_rate(mut self, rate: Decimal) -> Self {
        self.withholding_rate = rate;
        self
    }

    pub fn build(self) -> ReceiptLine {
        ReceiptLine {
            id: self.id,
            name: self.name,
            quantity: self.quantity,
            unit: self.unit,
            unit_price: self.unit_price,
            withholding_rate: self.withholding_rate,
            line_amount: None,
            withholding_amount: None,
        }
    }
}
