//! End-to-end tests for document construction, totals and validation.

use chrono::NaiveDate;
use ets::core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seller() -> Party {
    PartyBuilder::new(
        "ACME Yazılım A.Ş.",
        "1234567890",
        AddressBuilder::new("İstanbul")
            .street("Bağdat Caddesi")
            .building_number("12")
            .district("Kadıköy")
            .postal_code("34710")
            .build(),
    )
    .tax_office("Kadıköy")
    .email("fatura@acme.com.tr")
    .build()
}

fn buyer() -> Party {
    PartyBuilder::new(
        "Müşteri Ltd. Şti.",
        "9876543217",
        AddressBuilder::new("Ankara").district("Çankaya").build(),
    )
    .tax_office("Çankaya")
    .build()
}

fn person(name: &str, surname: &str) -> Party {
    PartyBuilder::new(
        format!("{name} {surname}"),
        "10000000146",
        AddressBuilder::new("Konya").build(),
    )
    .person(name, surname)
    .build()
}

fn consulting_line(id: &str) -> LineItem {
    LineItemBuilder::new(id, "Danışmanlık", dec!(10), "HUR", dec!(150)).build()
}

fn base_invoice() -> InvoiceBuilder {
    InvoiceBuilder::new(date(2024, 6, 15))
        .seller(seller())
        .buyer(buyer())
}

fn validation_message(err: EtsError) -> String {
    match err {
        EtsError::Validation(msg) => msg,
        other => panic!("expected validation error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Invoices
// ---------------------------------------------------------------------------

#[test]
fn sale_invoice_totals() {
    let invoice = base_invoice()
        .number("ABC2024000000001")
        .add_line(consulting_line("1"))
        .add_line(
            LineItemBuilder::new("2", "Lisans", dec!(2), "C62", dec!(500))
                .discount_rate(dec!(10))
                .build(),
        )
        .add_line(
            LineItemBuilder::new("3", "Kitap", dec!(3), "C62", dec!(40))
                .vat_rate(dec!(10))
                .build(),
        )
        .build()
        .unwrap();

    let totals = invoice.totals.as_ref().unwrap();
    assert_eq!(totals.line_extension, dec!(2620));
    assert_eq!(totals.discount_total, dec!(100));
    assert_eq!(totals.tax_exclusive, dec!(2520));
    assert_eq!(totals.vat_total, dec!(492));
    assert_eq!(totals.tax_inclusive, dec!(3012));
    assert_eq!(totals.withholding_total, Decimal::ZERO);
    assert_eq!(totals.payable, dec!(3012));

    assert_eq!(totals.vat_breakdown.len(), 2);
    assert_eq!(totals.vat_breakdown[0].rate, dec!(10));
    assert_eq!(totals.vat_breakdown[0].taxable_amount, dec!(120));
    assert_eq!(totals.vat_breakdown[0].tax_amount, dec!(12));
    assert_eq!(totals.vat_breakdown[1].rate, dec!(20));
    assert_eq!(totals.vat_breakdown[1].taxable_amount, dec!(2400));
    assert_eq!(totals.vat_breakdown[1].tax_amount, dec!(480));

    assert_eq!(invoice.lines[1].line_amount, Some(dec!(900)));
    assert_eq!(invoice.lines[1].vat_amount, Some(dec!(180)));
    assert!(validate_invoice(&invoice).is_empty());
}

#[test]
fn line_amounts_round_half_up() {
    let invoice = base_invoice()
        .add_line(LineItemBuilder::new("1", "Vida", dec!(3), "C62", dec!(0.125)).build())
        .build()
        .unwrap();
    // 0.375 -> 0.38, VAT 0.076 -> 0.08
    assert_eq!(invoice.lines[0].line_amount, Some(dec!(0.38)));
    assert_eq!(invoice.lines[0].vat_amount, Some(dec!(0.08)));
    assert_eq!(invoice.totals.unwrap().payable, dec!(0.46));
}

#[test]
fn withholding_invoice() {
    let invoice = base_invoice()
        .invoice_type(InvoiceType::Tevkifat)
        .add_line(
            LineItemBuilder::new("1", "Temizlik hizmeti", dec!(1), "C62", dec!(1000))
                .withholding("624", dec!(50))
                .build(),
        )
        .build()
        .unwrap();
    let totals = invoice.totals.unwrap();
    assert_eq!(totals.vat_total, dec!(200));
    assert_eq!(totals.withholding_total, dec!(100));
    assert_eq!(totals.tax_inclusive, dec!(1200));
    assert_eq!(totals.payable, dec!(1100));
}

#[test]
fn withholding_type_requires_withheld_line() {
    let err = base_invoice()
        .invoice_type(InvoiceType::Tevkifat)
        .add_line(consulting_line("1"))
        .build()
        .unwrap_err();
    assert!(validation_message(err).contains("TEVKIFAT"));
}

#[test]
fn return_invoice_requires_billing_reference() {
    let err = base_invoice()
        .invoice_type(InvoiceType::Iade)
        .add_line(consulting_line("1"))
        .build()
        .unwrap_err();
    assert!(validation_message(err).contains("billing_reference"));

    let ok = base_invoice()
        .invoice_type(InvoiceType::Iade)
        .billing_reference("ABC2024000000007", Some(date(2024, 6, 1)))
        .add_line(consulting_line("1"))
        .build();
    assert!(ok.is_ok());
}

#[test]
fn export_invoice_must_be_exempt_type() {
    let export_line = || {
        LineItemBuilder::new("1", "Tekstil", dec!(100), "C62", dec!(12))
            .vat_rate(Decimal::ZERO)
            .exemption("301", Some("İhracat istisnası".into()))
            .build()
    };
    let err = base_invoice()
        .profile(InvoiceProfile::Ihracat)
        .currency("USD", dec!(32.45))
        .add_line(export_line())
        .build()
        .unwrap_err();
    assert!(validation_message(err).contains("ISTISNA"));

    let invoice = base_invoice()
        .profile(InvoiceProfile::Ihracat)
        .invoice_type(InvoiceType::Istisna)
        .currency("USD", dec!(32.45))
        .add_line(export_line())
        .build()
        .unwrap();
    assert_eq!(invoice.totals.unwrap().vat_total, Decimal::ZERO);
}

#[test]
fn zero_rate_needs_exemption_code() {
    let err = base_invoice()
        .add_line(
            LineItemBuilder::new("1", "Kitap", dec!(1), "C62", dec!(50))
                .vat_rate(Decimal::ZERO)
                .build(),
        )
        .build()
        .unwrap_err();
    assert!(validation_message(err).contains("exemption"));

    let err = base_invoice()
        .add_line(
            LineItemBuilder::new("1", "Kitap", dec!(1), "C62", dec!(50))
                .vat_rate(Decimal::ZERO)
                .exemption("35", None)
                .build(),
        )
        .build()
        .unwrap_err();
    assert!(validation_message(err).contains("3 digits"));
}

#[test]
fn foreign_currency_needs_exchange_rate() {
    let mut invoice = base_invoice()
        .add_line(consulting_line("1"))
        .build_unchecked()
        .unwrap();
    invoice.currency_code = "EUR".into();
    let errors = validate_invoice(&invoice);
    assert!(errors.iter().any(|e| e.field == "exchange_rate"));

    invoice.exchange_rate = Some(dec!(-1));
    let errors = validate_invoice(&invoice);
    assert!(errors.iter().any(|e| e.message.contains("positive")));

    invoice.exchange_rate = Some(dec!(35.12));
    assert!(validate_invoice(&invoice).is_empty());
}

#[test]
fn public_invoice_requires_iban() {
    let err = base_invoice()
        .profile(InvoiceProfile::Kamu)
        .add_line(consulting_line("1"))
        .build()
        .unwrap_err();
    assert!(validation_message(err).contains("KAMU"));

    let invoice = base_invoice()
        .profile(InvoiceProfile::Kamu)
        .bank_transfer("TR33 0006 1005 1978 6457 8413 26", Some(date(2024, 7, 15)))
        .add_line(consulting_line("1"))
        .build()
        .unwrap();
    assert_eq!(invoice.payment.unwrap().means.code(), "42");
}

#[test]
fn bad_iban_and_due_date_reported() {
    let err = base_invoice()
        .bank_transfer("TR000006100519786457841326", Some(date(2024, 6, 1)))
        .add_line(consulting_line("1"))
        .build()
        .unwrap_err();
    let msg = validation_message(err);
    assert!(msg.contains("payment.iban"));
    assert!(msg.contains("payment.due_date"));
}

#[test]
fn anonymous_consumer_only_on_e_archive() {
    let anonymous = || {
        PartyBuilder::new("Nihai Tüketici", ANONYMOUS_TCKN, AddressBuilder::new("İzmir").build())
            .build()
    };
    let invoice = InvoiceBuilder::new(date(2024, 6, 15))
        .profile(InvoiceProfile::EArsivFatura)
        .seller(seller())
        .buyer(anonymous())
        .add_line(consulting_line("1"))
        .build();
    assert!(invoice.is_ok());

    let err = InvoiceBuilder::new(date(2024, 6, 15))
        .seller(seller())
        .buyer(anonymous())
        .add_line(consulting_line("1"))
        .build()
        .unwrap_err();
    assert!(validation_message(err).contains("buyer.tax_id"));
}

#[test]
fn individual_buyer_needs_names() {
    let nameless = PartyBuilder::new("Ahmet Yılmaz", "10000000146", AddressBuilder::new("Bursa").build())
        .build();
    let err = base_invoice()
        .buyer(nameless)
        .add_line(consulting_line("1"))
        .build()
        .unwrap_err();
    assert!(validation_message(err).contains("buyer.first_name"));

    assert!(
        base_invoice()
            .buyer(person("Ahmet", "Yılmaz"))
            .add_line(consulting_line("1"))
            .build()
            .is_ok()
    );
}

#[test]
fn foreign_party_tax_id_not_checksummed() {
    let foreign = PartyBuilder::new(
        "Müller GmbH",
        "DE123456789",
        AddressBuilder::new("Berlin").country("DE").build(),
    )
    .build();
    assert!(
        base_invoice()
            .buyer(foreign)
            .add_line(consulting_line("1"))
            .build()
            .is_ok()
    );
}

#[test]
fn all_errors_reported_together() {
    let bad_seller = PartyBuilder::new("", "1234567891", AddressBuilder::new("").build())
        .alias("fatura@acme.com.tr")
        .build();
    let invoice = base_invoice()
        .number("ABC2023000000001")
        .seller(bad_seller)
        .add_line(consulting_line("1"))
        .add_line(LineItemBuilder::new("1", "", dec!(0), "XYZ", dec!(-5)).build())
        .build_unchecked()
        .unwrap();
    let fields: Vec<String> = validate_invoice(&invoice)
        .into_iter()
        .map(|e| e.field)
        .collect();
    for expected in [
        "number",
        "seller.name",
        "seller.tax_id",
        "seller.alias",
        "seller.address.city",
        "lines[1].id",
        "lines[1].name",
        "lines[1].quantity",
        "lines[1].unit",
        "lines[1].unit_price",
    ] {
        assert!(fields.iter().any(|f| f == expected), "missing {expected} in {fields:?}");
    }
}

#[test]
fn builder_requires_parties_and_lines() {
    let err = InvoiceBuilder::new(date(2024, 6, 15))
        .buyer(buyer())
        .add_line(consulting_line("1"))
        .build()
        .unwrap_err();
    assert!(matches!(err, EtsError::Builder(msg) if msg.contains("seller")));

    let err = base_invoice().build().unwrap_err();
    assert!(matches!(err, EtsError::Builder(_)));

    let unchecked = base_invoice().build_unchecked().unwrap();
    assert!(
        validate_invoice(&unchecked)
            .iter()
            .any(|e| e.field == "lines")
    );
}

#[test]
fn line_limit_enforced() {
    let mut builder = base_invoice();
    for i in 0..=MAX_LINES {
        builder = builder.add_line(consulting_line(&i.to_string()));
    }
    let err = builder.build().unwrap_err();
    assert!(matches!(err, EtsError::Builder(msg) if msg.contains("line items")));
}

#[test]
fn note_limit_enforced() {
    let note_text = |n: usize| format!("Not {n}");
    let over = MAX_NOTES + 1;

    let mut invoice = base_invoice().add_line(consulting_line("1"));
    for i in 0..over {
        invoice = invoice.note(note_text(i));
    }
    let err = invoice.build().unwrap_err();
    assert!(matches!(err, EtsError::Builder(msg) if msg.contains("notes")));

    let mut note = dispatch().carrier("Hızlı Kargo A.Ş.", "4567890128");
    for i in 0..over {
        note = note.note(note_text(i));
    }
    let err = note.build().unwrap_err();
    assert!(matches!(err, EtsError::Builder(msg) if msg.contains("notes")));

    let mut receipt = ProducerReceiptBuilder::new(date(2024, 7, 1))
        .issuer(seller())
        .producer(person("Ahmet", "Yılmaz"))
        .add_line(ReceiptLineBuilder::new("1", "Buğday", dec!(1000), "KGM", dec!(12.50)).build());
    for i in 0..over {
        receipt = receipt.note(note_text(i));
    }
    let err = receipt.build().unwrap_err();
    assert!(matches!(err, EtsError::Builder(msg) if msg.contains("notes")));

    // exactly at the limit is fine
    let mut invoice = base_invoice().add_line(consulting_line("1"));
    for i in 0..MAX_NOTES {
        invoice = invoice.note(note_text(i));
    }
    assert_eq!(invoice.build().unwrap().notes.len(), MAX_NOTES);
}

#[test]
fn tampered_totals_detected() {
    let mut invoice = base_invoice()
        .add_line(consulting_line("1"))
        .build()
        .unwrap();
    if let Some(totals) = invoice.totals.as_mut() {
        totals.payable += dec!(0.01);
    }
    let errors = validate_arithmetic(&invoice);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "totals.payable");
}

#[test]
fn invoice_json_shape() {
    let invoice = base_invoice()
        .number("ABC2024000000001")
        .add_line(
            LineItemBuilder::new("1", "Lisans", dec!(2), "C62", dec!(500))
                .discount_rate(dec!(10))
                .build(),
        )
        .build()
        .unwrap();

    let json = serde_json::to_value(&invoice).unwrap();
    assert_eq!(json["number"], "ABC2024000000001");
    assert_eq!(json["issueDate"], "2024-06-15");
    assert_eq!(json["profile"], "TEMELFATURA");
    assert_eq!(json["invoiceType"], "SATIS");
    assert_eq!(json["currencyCode"], "TRY");
    assert_eq!(json["seller"]["taxId"], "1234567890");
    assert_eq!(json["seller"]["address"]["countryCode"], "TR");
    assert_eq!(json["lines"][0]["discount"]["type"], "rate");
    assert!(json["lines"][0]["unitPrice"].is_string());

    let payable: Decimal = json["totals"]["payable"].as_str().unwrap().parse().unwrap();
    assert_eq!(payable, dec!(1080));

    let back: Invoice = serde_json::from_value(json).unwrap();
    assert_eq!(back.uuid, invoice.uuid);
    assert_eq!(back.lines[0].discount, Some(Discount::Rate(dec!(10))));
    assert!(validate_invoice(&back).is_empty());
}

// ---------------------------------------------------------------------------
// Dispatch notes
// ---------------------------------------------------------------------------

fn dispatch() -> DispatchBuilder {
    DispatchBuilder::new(date(2024, 6, 15), date(2024, 6, 16))
        .supplier(seller())
        .customer(buyer())
        .add_line(DispatchLineBuilder::new("1", "Koli", dec!(5), "C62").build())
}

#[test]
fn dispatch_with_own_vehicle() {
    let note = dispatch()
        .driver("Ali", "Veli", "10000000146")
        .vehicle_plate("34ABC123")
        .build()
        .unwrap();
    assert_eq!(note.dispatch_type, DispatchType::Sevk);
    assert_eq!(note.shipment.drivers.len(), 1);
    // delivery address falls back to the customer's
    assert_eq!(note.shipment.delivery_address.city, "Ankara");
    assert!(validate_dispatch(&note).is_empty());
}

#[test]
fn dispatch_with_carrier() {
    let note = dispatch()
        .carrier("Hızlı Kargo A.Ş.", "4567890128")
        .delivery_address(AddressBuilder::new("Eskişehir").build())
        .build()
        .unwrap();
    assert_eq!(note.shipment.delivery_address.city, "Eskişehir");

    let json = serde_json::to_value(&note).unwrap();
    assert_eq!(json["dispatchType"], "SEVK");
    assert_eq!(json["shipment"]["carrier"]["taxId"], "4567890128");
    assert_eq!(json["shipment"]["shipmentDate"], "2024-06-16");
}

#[test]
fn dispatch_needs_transport() {
    let err = dispatch().build().unwrap_err();
    let msg = validation_message(err);
    assert!(msg.contains("shipment.drivers"));
    assert!(msg.contains("shipment.vehicle_plate"));

    let err = dispatch()
        .driver("Ali", "Veli", "10000000147")
        .vehicle_plate("34ABC123")
        .build()
        .unwrap_err();
    assert!(validation_message(err).contains("shipment.drivers[0].tckn"));

    let err = dispatch()
        .carrier("Kargo", "123")
        .build()
        .unwrap_err();
    assert!(validation_message(err).contains("shipment.carrier.tax_id"));
}

#[test]
fn dispatch_shipment_not_before_issue() {
    let err = DispatchBuilder::new(date(2024, 6, 15), date(2024, 6, 14))
        .supplier(seller())
        .customer(buyer())
        .carrier("Hızlı Kargo A.Ş.", "4567890128")
        .add_line(DispatchLineBuilder::new("1", "Koli", dec!(5), "C62").build())
        .build()
        .unwrap_err();
    assert!(validation_message(err).contains("shipment.shipment_date"));
}

#[test]
fn dispatch_requires_lines() {
    let err = DispatchBuilder::new(date(2024, 6, 15), date(2024, 6, 15))
        .supplier(seller())
        .customer(buyer())
        .build()
        .unwrap_err();
    assert!(matches!(err, EtsError::Builder(_)));
}

// ---------------------------------------------------------------------------
// Producer receipts
// ---------------------------------------------------------------------------

#[test]
fn producer_receipt_totals() {
    let receipt = ProducerReceiptBuilder::new(date(2024, 7, 1))
        .issuer(seller())
        .producer(person("Ahmet", "Yılmaz"))
        .add_line(ReceiptLineBuilder::new("1", "Buğday", dec!(1000), "KGM", dec!(12.50)).build())
        .add_line(
            ReceiptLineBuilder::new("2", "Arpa", dec!(200), "KGM", dec!(9.75))
                .withholding_rate(dec!(4))
                .build(),
        )
        .build()
        .unwrap();

    assert_eq!(receipt.lines[0].withholding_amount, Some(dec!(250.00)));
    assert_eq!(receipt.lines[1].line_amount, Some(dec!(1950.00)));
    assert_eq!(receipt.lines[1].withholding_amount, Some(dec!(78.00)));

    let totals = receipt.totals.as_ref().unwrap();
    assert_eq!(totals.gross_total, dec!(14450.00));
    assert_eq!(totals.withholding_total, dec!(328.00));
    assert_eq!(totals.net_payable, dec!(14122.00));
    assert!(validate_producer_receipt(&receipt).is_empty());
}

#[test]
fn producer_must_be_individual() {
    let err = ProducerReceiptBuilder::new(date(2024, 7, 1))
        .issuer(seller())
        .producer(buyer())
        .add_line(ReceiptLineBuilder::new("1", "Buğday", dec!(1000), "KGM", dec!(12.50)).build())
        .build()
        .unwrap_err();
    assert!(validation_message(err).contains("producer must be identified by TCKN"));
}

#[test]
fn receipt_withholding_rate_bounded() {
    let err = ProducerReceiptBuilder::new(date(2024, 7, 1))
        .issuer(seller())
        .producer(person("Ayşe", "Demir"))
        .add_line(
            ReceiptLineBuilder::new("1", "Fındık", dec!(50), "KGM", dec!(120))
                .withholding_rate(dec!(101))
                .build(),
        )
        .build()
        .unwrap_err();
    assert!(validation_message(err).contains("withholding_rate"));
}

// ---------------------------------------------------------------------------
// Numbering and units
// ---------------------------------------------------------------------------

#[test]
fn numbering_feeds_builders() {
    let mut seq = DocumentNumberSequence::new("ETS", 2024).unwrap();
    let first = base_invoice()
        .number(seq.next_number().unwrap())
        .add_line(consulting_line("1"))
        .build()
        .unwrap();
    let second = base_invoice()
        .number(seq.next_number().unwrap())
        .add_line(consulting_line("1"))
        .build()
        .unwrap();
    assert_eq!(first.number.as_deref(), Some("ETS2024000000001"));
    assert_eq!(second.number.as_deref(), Some("ETS2024000000002"));
    assert_ne!(first.uuid, second.uuid);

    assert!(seq.auto_advance(date(2025, 1, 2)));
    assert_eq!(seq.peek().as_deref(), Some("ETS2025000000001"));
}

#[test]
fn unit_names() {
    assert_eq!(units::unit_name("C62"), Some("Adet"));
    assert_eq!(units::unit_name("KGM"), Some("Kilogram"));
    assert_eq!(units::unit_name("XYZ"), None);
    assert!(is_known_unit_code("HUR"));
    assert!(!is_known_unit_code("hur"));
}

#[test]
fn status_and_kind_helpers() {
    assert_eq!(DocumentKind::ProducerReceipt.path(), "producer-receipts");
    assert!(DocumentStatus::Rejected.is_final());
    assert!(!DocumentStatus::Queued.is_final());
    let status: DocumentStatus = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
    assert_eq!(status, DocumentStatus::Unknown);
}
