use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::{EtsError, join_errors};
use super::types::*;
use super::validation;

/// Maximum number of lines accepted on a single document.
pub const MAX_LINES: usize = 10_000;

/// Maximum number of free-text notes on a single document.
pub const MAX_NOTES: usize = 100;

/// Builder for constructing valid invoices.
///
/// ```
/// use ets::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let invoice = InvoiceBuilder::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
///     .profile(InvoiceProfile::TicariFatura)
///     .seller(PartyBuilder::new("ACME A.Ş.", "1234567890", AddressBuilder::new("İstanbul").build())
///         .tax_office("Kadıköy")
///         .build())
///     .buyer(PartyBuilder::new("Müşteri Ltd.", "9876543217", AddressBuilder::new("İzmir").build())
///         .build())
///     .add_line(LineItemBuilder::new("1", "Danışmanlık", dec!(10), "HUR", dec!(150.00))
///         .vat_rate(dec!(20))
///         .build())
///     .build();
/// assert!(invoice.is_ok());
/// ```
pub struct InvoiceBuilder {
    uuid: Option<Uuid>,
    number: Option<String>,
    issue_date: NaiveDate,
    issue_time: Option<NaiveTime>,
    profile: InvoiceProfile,
    invoice_type: InvoiceType,
    currency_code: String,
    exchange_rate: Option<Decimal>,
    notes: Vec<String>,
    order_reference: Option<DocumentReference>,
    billing_reference: Option<DocumentReference>,
    despatch_references: Vec<DocumentReference>,
    seller: Option<Party>,
    buyer: Option<Party>,
    lines: Vec<LineItem>,
    payment: Option<PaymentTerms>,
}

impl InvoiceBuilder {
    pub fn new(issue_date: NaiveDate) -> Self {
        Self {
            uuid: None,
            number: None,
            issue_date,
            issue_time: None,
            profile: InvoiceProfile::TemelFatura,
            invoice_type: InvoiceType::Satis,
            currency_code: "TRY".to_string(),
            exchange_rate: None,
            notes: Vec::new(),
            order_reference: None,
            billing_reference: None,
            despatch_references: Vec::new(),
            seller: None,
            buyer: None,
            lines: Vec::new(),
            payment: None,
        }
    }

    /// Use a fixed ETTN instead of generating one.
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

    pub fn profile(mut self, profile: InvoiceProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn invoice_type(mut self, invoice_type: InvoiceType) -> Self {
        self.invoice_type = invoice_type;
        self
    }

    /// Set a foreign currency together with its TRY exchange rate.
    pub fn currency(mut self, code: impl Into<String>, exchange_rate: Decimal) -> Self {
        self.currency_code = code.into();
        self.exchange_rate = Some(exchange_rate);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn order_reference(mut self, id: impl Into<String>, date: Option<NaiveDate>) -> Self {
        self.order_reference = Some(DocumentReference {
            id: id.into(),
            issue_date: date,
        });
        self
    }

    /// Reference the original invoice of a return (IADE).
    pub fn billing_reference(mut self, id: impl Into<String>, date: Option<NaiveDate>) -> Self {
        self.billing_reference = Some(DocumentReference {
            id: id.into(),
            issue_date: date,
        });
        self
    }

    pub fn add_despatch_reference(mut self, id: impl Into<String>, date: Option<NaiveDate>) -> Self {
        self.despatch_references.push(DocumentReference {
            id: id.into(),
            issue_date: date,
        });
        self
    }

    pub fn seller(mut self, party: Party) -> Self {
        self.seller = Some(party);
        self
    }

    pub fn buyer(mut self, party: Party) -> Self {
        self.buyer = Some(party);
        self
    }

    pub fn add_line(mut self, line: LineItem) -> Self {
        self.lines.push(line);
        self
    }

    pub fn payment(mut self, payment: PaymentTerms) -> Self {
        self.payment = Some(payment);
        self
    }

    /// Shorthand for a bank transfer to `iban`, optionally with a due date.
    pub fn bank_transfer(mut self, iban: impl Into<String>, due_date: Option<NaiveDate>) -> Self {
        self.payment = Some(PaymentTerms {
            means: PaymentMeans::BankTransfer,
            due_date,
            iban: Some(iban.into()),
            bank_name: None,
            note: None,
        });
        self
    }

    fn assemble(self) -> Result<Invoice, EtsError> {
        let seller = self
            .seller
            .ok_or_else(|| EtsError::Builder("seller is required".into()))?;
        let buyer = self
            .buyer
            .ok_or_else(|| EtsError::Builder("buyer is required".into()))?;

        Ok(Invoice {
            uuid: self.uuid.unwrap_or_else(Uuid::new_v4),
            number: self.number,
            issue_date: self.issue_date,
            issue_time: self.issue_time,
            profile: self.profile,
            invoice_type: self.invoice_type,
            currency_code: self.currency_code,
            exchange_rate: self.exchange_rate,
            notes: self.notes,
            order_reference: self.order_reference,
            billing_reference: self.billing_reference,
            despatch_references: self.despatch_references,
            seller,
            buyer,
            lines: self.lines,
            payment: self.payment,
            totals: None,
        })
    }

    /// Build the invoice, calculating totals and running validation.
    /// Returns all validation errors (not just the first).
    pub fn build(self) -> Result<Invoice, EtsError> {
        if self.lines.is_empty() {
            return Err(EtsError::Builder(
                "at least one line item is required".into(),
            ));
        }
        check_limits(self.lines.len(), self.notes.len())?;

        let mut invoice = self.assemble()?;
        validation::calculate_totals(&mut invoice);

        let errors = validation::validate_invoice(&invoice);
        if !errors.is_empty() {
            return Err(join_errors(&errors));
        }

        Ok(invoice)
    }

    /// Build without validation, useful for testing or importing external data.
    pub fn build_unchecked(self) -> Result<Invoice, EtsError> {
        let mut invoice = self.assemble()?;
        validation::calculate_totals(&mut invoice);
        Ok(invoice)
    }
}

/// Input limits shared by all document builders.
pub(crate) fn check_limits(lines: usize, notes: usize) -> Result<(), EtsError> {
    if lines > MAX_LINES {
        return Err(EtsError::Builder(format!(
            "document cannot have more than {MAX_LINES} line items"
        )));
    }
    if notes > MAX_NOTES {
        return Err(EtsError::Builder(format!(
            "document cannot have more than {MAX_NOTES} notes"
        )));
    }
    Ok(())
}

/// Builder for Party.
pub struct PartyBuilder {
    name: String,
    tax_id: String,
    tax_office: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    address: Address,
    contact: Option<Contact>,
    alias: Option<String>,
    mersis_no: Option<String>,
    trade_registry_no: Option<String>,
}

impl PartyBuilder {
    pub fn new(name: impl Into<String>, tax_id: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            tax_id: tax_id.into(),
            tax_office: None,
            first_name: None,
            last_name: None,
            address,
            contact: None,
            alias: None,
            mersis_no: None,
            trade_registry_no: None,
        }
    }

    pub fn tax_office(mut self, office: impl Into<String>) -> Self {
        self.tax_office = Some(office.into());
        self
    }

    /// First and last name of an individual (TCKN) party.
    pub fn person(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }

    pub fn contact(mut self, contact: Contact) -> Self {
        self.contact = Some(contact);
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.contact.get_or_insert_with(Contact::default).email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.contact.get_or_insert_with(Contact::default).phone = Some(phone.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn mersis_no(mut self, no: impl Into<String>) -> Self {
        self.mersis_no = Some(no.into());
        self
    }

    pub fn trade_registry_no(mut self, no: impl Into<String>) -> Self {
        self.trade_registry_no = Some(no.into());
        self
    }

    pub fn build(self) -> Party {
        Party {
            name: self.name,
            tax_id: self.tax_id,
            tax_office: self.tax_office,
            first_name: self.first_name,
            last_name: self.last_name,
            address: self.address,
            contact: self.contact,
            alias: self.alias,
            mersis_no: self.mersis_no,
            trade_registry_no: self.trade_registry_no,
        }
    }
}

/// Builder for Address. Country defaults to "TR".
pub struct AddressBuilder {
    street: Option<String>,
    building_number: Option<String>,
    district: Option<String>,
    city: String,
    postal_code: Option<String>,
    country_code: String,
}

impl AddressBuilder {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            street: None,
            building_number: None,
            district: None,
            city: city.into(),
            postal_code: None,
            country_code: "TR".to_string(),
        }
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    pub fn building_number(mut self, number: impl Into<String>) -> Self {
        self.building_number = Some(number.into());
        self
    }

    pub fn district(mut self, district: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self
    }

    pub fn postal_code(mut self, code: impl Into<String>) -> Self {
        self.postal_code = Some(code.into());
        self
    }

    pub fn country(mut self, code: impl Into<String>) -> Self {
        self.country_code = code.into();
        self
    }

    pub fn build(self) -> Address {
        Address {
            street: self.street,
            building_number: self.building_number,
            district: self.district,
            city: self.city,
            postal_code: self.postal_code,
            country_code: self.country_code,
        }
    }
}

/// Builder for LineItem. VAT rate defaults to 20%.
pub struct LineItemBuilder {
    id: String,
    name: String,
    description: Option<String>,
    quantity: Decimal,
    unit: String,
    unit_price: Decimal,
    discount: Option<Discount>,
    vat_rate: Decimal,
    withholding: Option<Withholding>,
    exemption: Option<TaxExemption>,
    seller_item_id: Option<String>,
}

impl LineItemBuilder {
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
            description: None,
            quantity,
            unit: unit.into(),
            unit_price,
            discount: None,
            vat_rate: Decimal::new(20, 0),
            withholding: None,
            exemption: None,
            seller_item_id: None,
        }
    }

    pub fn vat_rate(mut self, rate: Decimal) -> Self {
        self.vat_rate = rate;
        self
    }

    pub fn discount_rate(mut self, rate: Decimal) -> Self {
        self.discount = Some(Discount::Rate(rate));
        self
    }

    pub fn discount_amount(mut self, amount: Decimal) -> Self {
        self.discount = Some(Discount::Amount(amount));
        self
    }

    pub fn withholding(mut self, code: impl Into<String>, rate: Decimal) -> Self {
        self.withholding = Some(Withholding {
            code: code.into(),
            rate,
        });
        self
    }

    pub fn exemption(mut self, code: impl Into<String>, reason: Option<String>) -> Self {
        self.exemption = Some(TaxExemption {
            code: code.into(),
            reason,
        });
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn seller_item_id(mut self, id: impl Into<String>) -> Self {
        self.seller_item_id = Some(id.into());
        self
    }

    pub fn build(self) -> LineItem {
        LineItem {
            id: self.id,
            name: self.name,
            description: self.description,
            quantity: self.quantity,
            unit: self.unit,
            unit_price: self.unit_price,
            discount: self.discount,
            vat_rate: self.vat_rate,
            withholding: self.withholding,
            exemption: self.exemption,
            seller_item_id: self.seller_item_id,
            line_amount: None,
            vat_amount: None,
            withholding_amount: None,
        }
    }
}
