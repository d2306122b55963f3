use std::collections::{BTreeMap, HashSet};

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::ValidationError;
use super::identifiers::{
    ANONYMOUS_TCKN, TaxId, validate_iban, validate_tax_id, validate_tckn,
};
use super::numbering::{document_number_year, is_valid_document_number};
use super::types::*;
use super::units::is_known_unit_code;

/// Validate an invoice against the rules the platform enforces on submission.
/// Returns all validation errors found (not just the first).
pub fn validate_invoice(invoice: &Invoice) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(number) = &invoice.number {
        validate_number(number, invoice.issue_date.year(), &mut errors);
    }

    validate_party(&invoice.seller, "seller", false, &mut errors);

    // e-Arşiv invoices to unidentified consumers carry the placeholder TCKN
    let anonymous_buyer_allowed = invoice.profile == InvoiceProfile::EArsivFatura;
    validate_party(&invoice.buyer, "buyer", anonymous_buyer_allowed, &mut errors);

    validate_currency(invoice, &mut errors);

    if invoice.lines.is_empty() {
        errors.push(ValidationError::new(
            "lines",
            "invoice must have at least one line item",
        ));
    }

    let mut seen_ids = HashSet::new();
    for (i, line) in invoice.lines.iter().enumerate() {
        if !seen_ids.insert(line.id.as_str()) {
            errors.push(ValidationError::new(
                format!("lines[{i}].id"),
                format!("duplicate line identifier '{}'", line.id),
            ));
        }
        validate_line(line, i, invoice.invoice_type, &mut errors);
    }

    validate_invoice_type(invoice, &mut errors);

    if let Some(payment) = &invoice.payment {
        if let Some(iban) = &payment.iban {
            if let Err(e) = validate_iban(iban) {
                errors.push(ValidationError::new(
                    "payment.iban",
                    format!("invalid IBAN '{iban}': {e}"),
                ));
            }
        }
        if let Some(due) = payment.due_date {
            if due < invoice.issue_date {
                errors.push(ValidationError::new(
                    "payment.due_date",
                    format!(
                        "due date {due} must not be before issue date {}",
                        invoice.issue_date
                    ),
                ));
            }
        }
    }

    if invoice.profile == InvoiceProfile::Kamu
        && invoice.payment.as_ref().and_then(|p| p.iban.as_ref()).is_none()
    {
        errors.push(ValidationError::new(
            "payment.iban",
            "KAMU invoices must state the beneficiary IBAN",
        ));
    }

    errors.extend(validate_arithmetic(invoice));

    errors
}

/// Validate invoice arithmetic (totals, rounding).
pub fn validate_arithmetic(invoice: &Invoice) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let Some(totals) = &invoice.totals else {
        errors.push(ValidationError::new(
            "totals",
            "totals must be calculated before validation (call calculate_totals first)",
        ));
        return errors;
    };

    let expected_net: Decimal = invoice.lines.iter().filter_map(|l| l.line_amount).sum();
    if totals.tax_exclusive != expected_net {
        errors.push(ValidationError::new(
            "totals.tax_exclusive",
            format!(
                "net total {} does not match sum of line amounts {}",
                totals.tax_exclusive, expected_net
            ),
        ));
    }

    if totals.tax_exclusive != totals.line_extension - totals.discount_total {
        errors.push(ValidationError::new(
            "totals.tax_exclusive",
            format!(
                "net total {} does not match line extension {} - discounts {}",
                totals.tax_exclusive, totals.line_extension, totals.discount_total
            ),
        ));
    }

    if totals.tax_inclusive != totals.tax_exclusive + totals.vat_total {
        errors.push(ValidationError::new(
            "totals.tax_inclusive",
            format!(
                "gross total {} does not match net {} + VAT {}",
                totals.tax_inclusive, totals.tax_exclusive, totals.vat_total
            ),
        ));
    }

    if totals.payable != totals.tax_inclusive - totals.withholding_total {
        errors.push(ValidationError::new(
            "totals.payable",
            format!(
                "payable {} does not match gross {} - withholding {}",
                totals.payable, totals.tax_inclusive, totals.withholding_total
            ),
        ));
    }

    let breakdown_vat: Decimal = totals.vat_breakdown.iter().map(|b| b.tax_amount).sum();
    if totals.vat_total != breakdown_vat {
        errors.push(ValidationError::new(
            "totals.vat_total",
            format!(
                "VAT total {} does not match sum of breakdown amounts {}",
                totals.vat_total, breakdown_vat
            ),
        ));
    }

    errors
}

/// Line gross amount: quantity times unit price, rounded to kuruş.
fn line_gross(line: &LineItem) -> Decimal {
    round_half_up(line.quantity * line.unit_price, 2)
}

/// Calculate line amounts and totals for an invoice (mutates in place).
pub fn calculate_totals(invoice: &mut Invoice) {
    let mut line_extension = Decimal::ZERO;
    let mut discount_total = Decimal::ZERO;
    let mut withholding_total = Decimal::ZERO;
    // rate -> (taxable, tax)
    let mut groups: BTreeMap<Decimal, (Decimal, Decimal)> = BTreeMap::new();

    for line in &mut invoice.lines {
        let gross = line_gross(line);
        let discount = match line.discount {
            Some(Discount::Rate(rate)) => round_half_up(gross * rate / dec!(100), 2),
            Some(Discount::Amount(amount)) => amount,
            None => Decimal::ZERO,
        };
        let amount = gross - discount;
        let vat = round_half_up(amount * line.vat_rate / dec!(100), 2);
        let withheld = line
            .withholding
            .as_ref()
            .map(|w| round_half_up(vat * w.rate / dec!(100), 2));

        line.line_amount = Some(amount);
        line.vat_amount = Some(vat);
        line.withholding_amount = withheld;

        line_extension += gross;
        discount_total += discount;
        withholding_total += withheld.unwrap_or(Decimal::ZERO);

        let entry = groups
            .entry(line.vat_rate.normalize())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 += amount;
        entry.1 += vat;
    }

    let vat_breakdown: Vec<VatBreakdown> = groups
        .into_iter()
        .map(|(rate, (taxable_amount, tax_amount))| VatBreakdown {
            rate,
            taxable_amount,
            tax_amount,
        })
        .collect();

    let tax_exclusive = line_extension - discount_total;
    let vat_total: Decimal = vat_breakdown.iter().map(|b| b.tax_amount).sum();
    let tax_inclusive = tax_exclusive + vat_total;

    invoice.totals = Some(Totals {
        line_extension,
        discount_total,
        tax_exclusive,
        vat_total,
        tax_inclusive,
        withholding_total,
        payable: tax_inclusive - withholding_total,
        vat_breakdown,
    });
}

/// Calculate line amounts and totals for a producer receipt (mutates in place).
pub fn calculate_receipt_totals(receipt: &mut ProducerReceipt) {
    let mut gross_total = Decimal::ZERO;
    let mut withholding_total = Decimal::ZERO;

    for line in &mut receipt.lines {
        let amount = round_half_up(line.quantity * line.unit_price, 2);
        let withheld = round_half_up(amount * line.withholding_rate / dec!(100), 2);
        line.line_amount = Some(amount);
        line.withholding_amount = Some(withheld);
        gross_total += amount;
        withholding_total += withheld;
    }

    receipt.totals = Some(ReceiptTotals {
        gross_total,
        withholding_total,
        net_payable: gross_total - withholding_total,
    });
}

/// Validate an e-İrsaliye dispatch note.
pub fn validate_dispatch(dispatch: &Dispatch) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(number) = &dispatch.number {
        validate_number(number, dispatch.issue_date.year(), &mut errors);
    }

    validate_party(&dispatch.supplier, "supplier", false, &mut errors);
    validate_party(&dispatch.customer, "customer", false, &mut errors);

    let shipment = &dispatch.shipment;
    if shipment.shipment_date < dispatch.issue_date {
        errors.push(ValidationError::new(
            "shipment.shipment_date",
            format!(
                "shipment date {} must not be before issue date {}",
                shipment.shipment_date, dispatch.issue_date
            ),
        ));
    }

    match &shipment.carrier {
        Some(carrier) => {
            if carrier.name.trim().is_empty() {
                errors.push(ValidationError::new(
                    "shipment.carrier.name",
                    "carrier name must not be empty",
                ));
            }
            if let Err(e) = validate_tax_id(&carrier.tax_id) {
                errors.push(ValidationError::new(
                    "shipment.carrier.tax_id",
                    format!("invalid carrier tax id '{}': {e}", carrier.tax_id),
                ));
            }
        }
        None => {
            if shipment.drivers.is_empty() {
                errors.push(ValidationError::new(
                    "shipment.drivers",
                    "a carrier or at least one driver is required",
                ));
            }
            let plate_missing = shipment
                .vehicle_plate
                .as_ref()
                .is_none_or(|p| p.trim().is_empty());
            if plate_missing {
                errors.push(ValidationError::new(
                    "shipment.vehicle_plate",
                    "vehicle plate is required when no carrier is given",
                ));
            }
        }
    }

    for (i, driver) in shipment.drivers.iter().enumerate() {
        let prefix = format!("shipment.drivers[{i}]");
        if driver.first_name.trim().is_empty() || driver.last_name.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("{prefix}.name"),
                "driver first and last name must not be empty",
            ));
        }
        if let Err(e) = validate_tckn(&driver.tckn) {
            errors.push(ValidationError::new(
                format!("{prefix}.tckn"),
                format!("invalid driver TCKN '{}': {e}", driver.tckn),
            ));
        }
    }

    validate_address(
        &shipment.delivery_address,
        "shipment.delivery_address",
        &mut errors,
    );

    if dispatch.lines.is_empty() {
        errors.push(ValidationError::new(
            "lines",
            "dispatch note must have at least one line",
        ));
    }

    let mut seen_ids = HashSet::new();
    for (i, line) in dispatch.lines.iter().enumerate() {
        let prefix = format!("lines[{i}]");
        if !seen_ids.insert(line.id.as_str()) {
            errors.push(ValidationError::new(
                format!("{prefix}.id"),
                format!("duplicate line identifier '{}'", line.id),
            ));
        }
        validate_line_basics(&line.id, &line.name, line.quantity, &line.unit, &prefix, &mut errors);
        if line.unit_price.is_some_and(|p| p.is_sign_negative()) {
            errors.push(ValidationError::new(
                format!("{prefix}.unit_price"),
                "unit price must not be negative",
            ));
        }
    }

    errors
}

/// Validate an e-Müstahsil producer receipt.
pub fn validate_producer_receipt(receipt: &ProducerReceipt) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(number) = &receipt.number {
        validate_number(number, receipt.issue_date.year(), &mut errors);
    }

    validate_party(&receipt.issuer, "issuer", false, &mut errors);
    validate_party(&receipt.producer, "producer", false, &mut errors);

    if matches!(validate_tax_id(&receipt.producer.tax_id), Ok(TaxId::Vkn(_))) {
        errors.push(ValidationError::new(
            "producer.tax_id",
            "producer must be identified by TCKN",
        ));
    }

    if receipt.lines.is_empty() {
        errors.push(ValidationError::new(
            "lines",
            "producer receipt must have at least one line",
        ));
    }

    let mut seen_ids = HashSet::new();
    for (i, line) in receipt.lines.iter().enumerate() {
        let prefix = format!("lines[{i}]");
        if !seen_ids.insert(line.id.as_str()) {
            errors.push(ValidationError::new(
                format!("{prefix}.id"),
                format!("duplicate line identifier '{}'", line.id),
            ));
        }
        validate_line_basics(&line.id, &line.name, line.quantity, &line.unit, &prefix, &mut errors);
        if line.unit_price.is_sign_negative() {
            errors.push(ValidationError::new(
                format!("{prefix}.unit_price"),
                "unit price must not be negative",
            ));
        }
        if !is_percentage(line.withholding_rate) {
            errors.push(ValidationError::new(
                format!("{prefix}.withholding_rate"),
                format!(
                    "withholding rate must be between 0 and 100, got: {}",
                    line.withholding_rate
                ),
            ));
        }
    }

    match &receipt.totals {
        None => errors.push(ValidationError::new(
            "totals",
            "totals must be calculated before validation (call calculate_receipt_totals first)",
        )),
        Some(totals) => {
            let expected: Decimal = receipt.lines.iter().filter_map(|l| l.line_amount).sum();
            if totals.gross_total != expected {
                errors.push(ValidationError::new(
                    "totals.gross_total",
                    format!(
                        "gross total {} does not match sum of line amounts {}",
                        totals.gross_total, expected
                    ),
                ));
            }
            if totals.net_payable != totals.gross_total - totals.withholding_total {
                errors.push(ValidationError::new(
                    "totals.net_payable",
                    format!(
                        "net payable {} does not match gross {} - withholding {}",
                        totals.net_payable, totals.gross_total, totals.withholding_total
                    ),
                ));
            }
        }
    }

    errors
}

/// Round a Decimal to `dp` decimal places using half-up (commercial rounding).
fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

fn is_percentage(value: Decimal) -> bool {
    !value.is_sign_negative() && value <= dec!(100)
}

fn validate_number(number: &str, issue_year: i32, errors: &mut Vec<ValidationError>) {
    if !is_valid_document_number(number) {
        errors.push(ValidationError::new(
            "number",
            format!(
                "document number '{number}' must be 3 series characters + 4 digit year + 9 digit serial"
            ),
        ));
        return;
    }
    if document_number_year(number) != Some(issue_year) {
        errors.push(ValidationError::new(
            "number",
            format!("document number '{number}' does not match issue year {issue_year}"),
        ));
    }
}

fn validate_party(
    party: &Party,
    prefix: &str,
    allow_anonymous: bool,
    errors: &mut Vec<ValidationError>,
) {
    if party.name.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{prefix}.name"),
            "name must not be empty",
        ));
    }

    let tax_id = party.tax_id.trim();
    let domestic = party.address.country_code == "TR";

    if tax_id.is_empty() {
        errors.push(ValidationError::new(
            format!("{prefix}.tax_id"),
            "tax id (VKN/TCKN) must not be empty",
        ));
    } else if allow_anonymous && tax_id == ANONYMOUS_TCKN {
        // placeholder consumer, no checksum
    } else if domestic {
        match validate_tax_id(tax_id) {
            Ok(TaxId::Tckn(_)) => {
                if party.first_name.is_none() || party.last_name.is_none() {
                    errors.push(ValidationError::new(
                        format!("{prefix}.first_name"),
                        "parties identified by TCKN must state first and last name",
                    ));
                }
            }
            Ok(TaxId::Vkn(_)) => {}
            Err(e) => errors.push(ValidationError::new(
                format!("{prefix}.tax_id"),
                format!("invalid tax id '{tax_id}': {e}"),
            )),
        }
    }

    if let Some(alias) = &party.alias {
        if !alias.starts_with("urn:mail:") {
            errors.push(ValidationError::new(
                format!("{prefix}.alias"),
                format!("alias '{alias}' must start with 'urn:mail:'"),
            ));
        }
    }

    validate_address(&party.address, &format!("{prefix}.address"), errors);
}

fn validate_address(address: &Address, prefix: &str, errors: &mut Vec<ValidationError>) {
    if address.city.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{prefix}.city"),
            "city must not be empty",
        ));
    }

    let cc = &address.country_code;
    if cc.len() != 2 || !cc.chars().all(|c| c.is_ascii_uppercase()) {
        errors.push(ValidationError::new(
            format!("{prefix}.country_code"),
            format!("country code '{cc}' must be 2 upper-case letters (ISO 3166-1 alpha-2)"),
        ));
    }
}

fn validate_currency(invoice: &Invoice, errors: &mut Vec<ValidationError>) {
    let code = &invoice.currency_code;
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        errors.push(ValidationError::new(
            "currency_code",
            format!("currency code '{code}' must be 3 upper-case letters (ISO 4217)"),
        ));
        return;
    }

    if code != "TRY" {
        match invoice.exchange_rate {
            Some(rate) if rate > Decimal::ZERO => {}
            Some(rate) => errors.push(ValidationError::new(
                "exchange_rate",
                format!("exchange rate must be positive, got: {rate}"),
            )),
            None => errors.push(ValidationError::new(
                "exchange_rate",
                format!("exchange rate is required for currency {code}"),
            )),
        }
    }
}

fn validate_line_basics(
    id: &str,
    name: &str,
    quantity: Decimal,
    unit: &str,
    prefix: &str,
    errors: &mut Vec<ValidationError>,
) {
    if id.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{prefix}.id"),
            "line identifier must not be empty",
        ));
    }
    if name.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{prefix}.name"),
            "item name must not be empty",
        ));
    }
    if quantity <= Decimal::ZERO {
        errors.push(ValidationError::new(
            format!("{prefix}.quantity"),
            format!("quantity must be positive, got: {quantity}"),
        ));
    }
    if !is_known_unit_code(unit) {
        errors.push(ValidationError::new(
            format!("{prefix}.unit"),
            format!("unknown unit code '{unit}'"),
        ));
    }
}

fn validate_line(
    line: &LineItem,
    index: usize,
    invoice_type: InvoiceType,
    errors: &mut Vec<ValidationError>,
) {
    let prefix = format!("lines[{index}]");

    validate_line_basics(&line.id, &line.name, line.quantity, &line.unit, &prefix, errors);

    if line.unit_price.is_sign_negative() {
        errors.push(ValidationError::new(
            format!("{prefix}.unit_price"),
            "unit price must not be negative",
        ));
    }

    if !is_percentage(line.vat_rate) {
        errors.push(ValidationError::new(
            format!("{prefix}.vat_rate"),
            format!("VAT rate must be between 0 and 100, got: {}", line.vat_rate),
        ));
    }

    match line.discount {
        Some(Discount::Rate(rate)) if !is_percentage(rate) => {
            errors.push(ValidationError::new(
                format!("{prefix}.discount"),
                format!("discount rate must be between 0 and 100, got: {rate}"),
            ));
        }
        Some(Discount::Amount(amount)) => {
            if amount.is_sign_negative() || amount > line_gross(line) {
                errors.push(ValidationError::new(
                    format!("{prefix}.discount"),
                    format!("discount amount {amount} must be between 0 and the line gross amount"),
                ));
            }
        }
        _ => {}
    }

    if line.vat_rate.is_zero() && line.exemption.is_none() {
        errors.push(ValidationError::new(
            format!("{prefix}.exemption"),
            "zero-rated lines must state an exemption reason code",
        ));
    }

    if let Some(exemption) = &line.exemption {
        if exemption.code.len() != 3 || !exemption.code.chars().all(|c| c.is_ascii_digit()) {
            errors.push(ValidationError::new(
                format!("{prefix}.exemption.code"),
                format!("exemption code '{}' must be 3 digits", exemption.code),
            ));
        }
    }

    match &line.withholding {
        Some(w) if invoice_type == InvoiceType::Tevkifat => {
            if w.code.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("{prefix}.withholding.code"),
                    "withholding code must not be empty",
                ));
            }
            if w.rate <= Decimal::ZERO || w.rate > dec!(100) {
                errors.push(ValidationError::new(
                    format!("{prefix}.withholding.rate"),
                    format!("withholding rate must be in (0, 100], got: {}", w.rate),
                ));
            }
            if line.vat_rate.is_zero() {
                errors.push(ValidationError::new(
                    format!("{prefix}.withholding"),
                    "withholding requires a non-zero VAT rate",
                ));
            }
        }
        Some(_) => {
            errors.push(ValidationError::new(
                format!("{prefix}.withholding"),
                format!(
                    "withholding is only allowed on TEVKIFAT invoices, not {}",
                    invoice_type.code()
                ),
            ));
        }
        None => {}
    }

    if invoice_type == InvoiceType::Istisna && !line.vat_rate.is_zero() {
        errors.push(ValidationError::new(
            format!("{prefix}.vat_rate"),
            "ISTISNA invoice lines must be zero rated",
        ));
    }
}

fn validate_invoice_type(invoice: &Invoice, errors: &mut Vec<ValidationError>) {
    match invoice.invoice_type {
        InvoiceType::Tevkifat => {
            if !invoice.lines.iter().any(|l| l.withholding.is_some()) {
                errors.push(ValidationError::new(
                    "lines",
                    "TEVKIFAT invoice must have at least one line with withholding",
                ));
            }
        }
        InvoiceType::Iade => {
            if invoice.billing_reference.is_none() {
                errors.push(ValidationError::new(
                    "billing_reference",
                    "IADE invoice must reference the original invoice",
                ));
            }
        }
        InvoiceType::Satis
        | InvoiceType::Istisna
        | InvoiceType::OzelMatrah
        | InvoiceType::IhracKayitli => {}
    }

    if invoice.profile == InvoiceProfile::Ihracat && invoice.invoice_type != InvoiceType::Istisna {
        errors.push(ValidationError::new(
            "invoice_type",
            format!(
                "IHRACAT invoices must use type ISTISNA, got: {}",
                invoice.invoice_type.code()
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::*;
    use chrono::NaiveDate;

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn test_address() -> Address {
        AddressBuilder::new("İstanbul").district("Kadıköy").build()
    }

    fn test_seller() -> Party {
        PartyBuilder::new("ACME Yazılım A.Ş.", "1234567890", test_address())
            .tax_office("Kadıköy")
            .build()
    }

    fn test_buyer() -> Party {
        PartyBuilder::new("Müşteri Ltd. Şti.", "9876543217", test_address()).build()
    }

    fn test_line() -> LineItem {
        LineItemBuilder::new("1", "Danışmanlık", dec!(10), "HUR", dec!(100))
            .vat_rate(dec!(20))
            .build()
    }

    fn base() -> InvoiceBuilder {
        InvoiceBuilder::new(test_date())
            .seller(test_seller())
            .buyer(test_buyer())
    }

    fn fields(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn valid_sale_invoice() {
        let invoice = base().add_line(test_line()).build().unwrap();
        let totals = invoice.totals.unwrap();
        assert_eq!(totals.tax_exclusive, dec!(1000));
        assert_eq!(totals.vat_total, dec!(200));
        assert_eq!(totals.payable, dec!(1200));
    }

    #[test]
    fn invalid_seller_vkn() {
        let invoice = InvoiceBuilder::new(test_date())
            .seller(PartyBuilder::new("ACME", "1234567891", test_address()).build())
            .buyer(test_buyer())
            .add_line(test_line())
            .build_unchecked()
            .unwrap();
        let errors = validate_invoice(&invoice);
        assert!(fields(&errors).contains(&"seller.tax_id"));
    }

    #[test]
    fn tckn_party_needs_person_name() {
        let invoice = base()
            .buyer(PartyBuilder::new("Ali Veli", "10000000146", test_address()).build())
            .add_line(test_line())
            .build_unchecked()
            .unwrap();
        let errors = validate_invoice(&invoice);
        assert!(fields(&errors).contains(&"buyer.first_name"));
    }

    #[test]
    fn anonymous_buyer_only_on_earsiv() {
        let anon = PartyBuilder::new("Nihai Tüketici", ANONYMOUS_TCKN, test_address())
            .person("Nihai", "Tüketici")
            .build();

        let earsiv = base()
            .profile(InvoiceProfile::EArsivFatura)
            .buyer(anon.clone())
            .add_line(test_line())
            .build();
        assert!(earsiv.is_ok());

        let temel = base()
            .buyer(anon)
            .add_line(test_line())
            .build_unchecked()
            .unwrap();
        assert!(fields(&validate_invoice(&temel)).contains(&"buyer.tax_id"));
    }

    #[test]
    fn foreign_currency_requires_rate() {
        let mut invoice = base().add_line(test_line()).build_unchecked().unwrap();
        invoice.currency_code = "EUR".into();
        let errors = validate_invoice(&invoice);
        assert!(fields(&errors).contains(&"exchange_rate"));

        invoice.exchange_rate = Some(dec!(35.1234));
        assert!(validate_invoice(&invoice).is_empty());
    }

    #[test]
    fn zero_rate_needs_exemption() {
        let line = LineItemBuilder::new("1", "Kitap", dec!(1), "C62", dec!(50))
            .vat_rate(dec!(0))
            .build();
        let invoice = base().add_line(line).build_unchecked().unwrap();
        assert!(fields(&validate_invoice(&invoice)).contains(&"lines[0].exemption"));
    }

    #[test]
    fn withholding_only_on_tevkifat() {
        let line = LineItemBuilder::new("1", "Temizlik hizmeti", dec!(1), "C62", dec!(1000))
            .withholding("624", dec!(20))
            .build();
        let sale = base().add_line(line.clone()).build_unchecked().unwrap();
        assert!(fields(&validate_invoice(&sale)).contains(&"lines[0].withholding"));

        let tevkifat = base()
            .invoice_type(InvoiceType::Tevkifat)
            .add_line(line)
            .build()
            .unwrap();
        let totals = tevkifat.totals.unwrap();
        assert_eq!(totals.vat_total, dec!(200));
        assert_eq!(totals.withholding_total, dec!(40));
        assert_eq!(totals.payable, dec!(1160));
    }

    #[test]
    fn tevkifat_requires_withholding_line() {
        let invoice = base()
            .invoice_type(InvoiceType::Tevkifat)
            .add_line(test_line())
            .build_unchecked()
            .unwrap();
        assert!(fields(&validate_invoice(&invoice)).contains(&"lines"));
    }

    #[test]
    fn iade_requires_billing_reference() {
        let invoice = base()
            .invoice_type(InvoiceType::Iade)
            .add_line(test_line())
            .build_unchecked()
            .unwrap();
        assert!(fields(&validate_invoice(&invoice)).contains(&"billing_reference"));
    }

    #[test]
    fn kamu_requires_iban() {
        let invoice = base()
            .profile(InvoiceProfile::Kamu)
            .add_line(test_line())
            .build_unchecked()
            .unwrap();
        assert!(fields(&validate_invoice(&invoice)).contains(&"payment.iban"));

        let ok = base()
            .profile(InvoiceProfile::Kamu)
            .bank_transfer("TR330006100519786457841326", None)
            .add_line(test_line())
            .build();
        assert!(ok.is_ok());
    }

    #[test]
    fn discounts_and_breakdown() {
        let invoice = base()
            .add_line(
                LineItemBuilder::new("1", "Yazılım lisansı", dec!(3), "C62", dec!(333.33))
                    .discount_rate(dec!(10))
                    .build(),
            )
            .add_line(
                LineItemBuilder::new("2", "Gıda", dec!(2), "KGM", dec!(50))
                    .vat_rate(dec!(1))
                    .discount_amount(dec!(10))
                    .build(),
            )
            .build()
            .unwrap();

        let totals = invoice.totals.clone().unwrap();
        // 999.99 - 100.00 = 899.99; 100.00 - 10.00 = 90.00
        assert_eq!(totals.line_extension, dec!(1099.99));
        assert_eq!(totals.discount_total, dec!(110.00));
        assert_eq!(totals.tax_exclusive, dec!(989.99));
        assert_eq!(totals.vat_breakdown.len(), 2);
        assert_eq!(totals.vat_breakdown[0].rate, dec!(1));
        assert_eq!(totals.vat_breakdown[0].tax_amount, dec!(0.90));
        assert_eq!(totals.vat_breakdown[1].tax_amount, dec!(180.00));
        assert_eq!(totals.vat_total, dec!(180.90));
        assert!(validate_arithmetic(&invoice).is_empty());
    }

    #[test]
    fn discount_amount_bounded_by_rounded_gross() {
        // 1 x 0.005 rounds to a gross of 0.01, which the discount may fully cover.
        let invoice = base()
            .add_line(
                LineItemBuilder::new("1", "Vida", dec!(1), "C62", dec!(0.005))
                    .discount_amount(dec!(0.01))
                    .build(),
            )
            .build_unchecked()
            .unwrap();
        let totals = invoice.totals.as_ref().unwrap();
        assert_eq!(totals.line_extension, dec!(0.01));
        assert_eq!(totals.discount_total, dec!(0.01));
        assert_eq!(totals.tax_exclusive, dec!(0.00));
        assert!(!fields(&validate_invoice(&invoice)).contains(&"lines[0].discount"));

        let over = base()
            .add_line(
                LineItemBuilder::new("1", "Vida", dec!(1), "C62", dec!(0.005))
                    .discount_amount(dec!(0.02))
                    .build(),
            )
            .build_unchecked()
            .unwrap();
        assert!(fields(&validate_invoice(&over)).contains(&"lines[0].discount"));
    }

    #[test]
    fn number_year_must_match() {
        let invoice = base()
            .number("ABC2023000000001")
            .add_line(test_line())
            .build_unchecked()
            .unwrap();
        assert!(fields(&validate_invoice(&invoice)).contains(&"number"));
    }

    #[test]
    fn duplicate_line_ids_detected() {
        let invoice = base()
            .add_line(test_line())
            .add_line(test_line())
            .build_unchecked()
            .unwrap();
        assert!(fields(&validate_invoice(&invoice)).contains(&"lines[1].id"));
    }

    #[test]
    fn ihracat_must_be_istisna() {
        let invoice = base()
            .profile(InvoiceProfile::Ihracat)
            .add_line(test_line())
            .build_unchecked()
            .unwrap();
        assert!(fields(&validate_invoice(&invoice)).contains(&"invoice_type"));
    }
}
