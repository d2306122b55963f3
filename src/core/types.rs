use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// e-Fatura / e-Arşiv invoice, the top-level document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// ETTN: universally unique document identifier.
    pub uuid: Uuid,
    /// GİB document number (e.g. "ABC2024000000001"). Assigned by the
    /// platform when absent.
    pub number: Option<String>,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Issue time.
    pub issue_time: Option<NaiveTime>,
    /// Scenario profile.
    pub profile: InvoiceProfile,
    /// Invoice type code.
    pub invoice_type: InvoiceType,
    /// Document currency (ISO 4217, e.g. "TRY").
    pub currency_code: String,
    /// TRY exchange rate; required when `currency_code` is not "TRY".
    pub exchange_rate: Option<Decimal>,
    /// Free-text notes.
    pub notes: Vec<String>,
    /// Purchase order reference.
    pub order_reference: Option<DocumentReference>,
    /// Original invoice number referenced by a return (IADE) invoice.
    pub billing_reference: Option<DocumentReference>,
    /// Dispatch notes (irsaliye) this invoice covers.
    pub despatch_references: Vec<DocumentReference>,
    /// Supplier.
    pub seller: Party,
    /// Customer.
    pub buyer: Party,
    /// Invoice lines.
    pub lines: Vec<LineItem>,
    /// Payment terms and bank account.
    pub payment: Option<PaymentTerms>,
    /// Calculated totals (set by `calculate_totals()`).
    pub totals: Option<Totals>,
}

/// Invoice scenario profile (ProfileID in UBL-TR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceProfile {
    /// Basic e-Fatura; no application response.
    TemelFatura,
    /// Commercial e-Fatura; the buyer may accept or reject.
    TicariFatura,
    /// e-Arşiv invoice to recipients not registered for e-Fatura.
    EArsivFatura,
    /// Export invoice.
    Ihracat,
    /// Invoice to a public institution.
    Kamu,
}

impl InvoiceProfile {
    /// UBL-TR ProfileID value.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TemelFatura => "TEMELFATURA",
            Self::TicariFatura => "TICARIFATURA",
            Self::EArsivFatura => "EARSIVFATURA",
            Self::Ihracat => "IHRACAT",
            Self::Kamu => "KAMU",
        }
    }

    /// Parse from a UBL-TR ProfileID value.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "TEMELFATURA" => Some(Self::TemelFatura),
            "TICARIFATURA" => Some(Self::TicariFatura),
            "EARSIVFATURA" => Some(Self::EArsivFatura),
            "IHRACAT" => Some(Self::Ihracat),
            "KAMU" => Some(Self::Kamu),
            _ => None,
        }
    }
}

/// Invoice type code (InvoiceTypeCode in UBL-TR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceType {
    /// Sale.
    Satis,
    /// Return.
    Iade,
    /// VAT withholding.
    Tevkifat,
    /// VAT exempt.
    Istisna,
    /// Special tax base.
    OzelMatrah,
    /// Export-registered sale.
    IhracKayitli,
}

impl InvoiceType {
    /// UBL-TR InvoiceTypeCode value.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Satis => "SATIS",
            Self::Iade => "IADE",
            Self::Tevkifat => "TEVKIFAT",
            Self::Istisna => "ISTISNA",
            Self::OzelMatrah => "OZELMATRAH",
            Self::IhracKayitli => "IHRACKAYITLI",
        }
    }

    /// Parse from a UBL-TR InvoiceTypeCode value.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "SATIS" => Some(Self::Satis),
            "IADE" => Some(Self::Iade),
            "TEVKIFAT" => Some(Self::Tevkifat),
            "ISTISNA" => Some(Self::Istisna),
            "OZELMATRAH" => Some(Self::OzelMatrah),
            "IHRACKAYITLI" => Some(Self::IhracKayitli),
            _ => None,
        }
    }
}

/// Seller, buyer, dispatch party, or producer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    /// Registered title (company name, or full name for individuals).
    pub name: String,
    /// VKN (10 digits) or TCKN (11 digits).
    pub tax_id: String,
    /// Tax office (vergi dairesi).
    pub tax_office: Option<String>,
    /// First name; expected when `tax_id` is a TCKN.
    pub first_name: Option<String>,
    /// Last name; expected when `tax_id` is a TCKN.
    pub last_name: Option<String>,
    /// Postal address.
    pub address: Address,
    /// Contact information.
    pub contact: Option<Contact>,
    /// GİB mailbox alias (e.g. "urn:mail:defaultpk@acme.com.tr").
    pub alias: Option<String>,
    /// MERSİS number.
    pub mersis_no: Option<String>,
    /// Trade registry number.
    pub trade_registry_no: Option<String>,
}

/// Postal address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street and neighbourhood.
    pub street: Option<String>,
    /// Building number.
    pub building_number: Option<String>,
    /// District (ilçe).
    pub district: Option<String>,
    /// City (il).
    pub city: String,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Country code (ISO 3166-1 alpha-2).
    pub country_code: String,
}

/// Contact information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

/// Reference to another document (order, dispatch note, original invoice).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReference {
    /// Referenced document number.
    pub id: String,
    /// Referenced document date.
    pub issue_date: Option<NaiveDate>,
}

/// Invoice line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Line identifier.
    pub id: String,
    /// Item name.
    pub name: String,
    /// Item description.
    pub description: Option<String>,
    /// Invoiced quantity.
    pub quantity: Decimal,
    /// Unit of measure (UN/ECE Rec 20, e.g. "C62" for piece, "KGM" for kilogram).
    pub unit: String,
    /// Net unit price.
    pub unit_price: Decimal,
    /// Line discount.
    pub discount: Option<Discount>,
    /// VAT (KDV) rate percentage.
    pub vat_rate: Decimal,
    /// VAT withholding (tevkifat) for TEVKIFAT invoices.
    pub withholding: Option<Withholding>,
    /// Exemption reason; required for zero-rated lines.
    pub exemption: Option<TaxExemption>,
    /// Seller's item identifier.
    pub seller_item_id: Option<String>,
    /// Calculated line amount after discount. Set by `calculate_totals()`.
    pub line_amount: Option<Decimal>,
    /// Calculated VAT amount. Set by `calculate_totals()`.
    pub vat_amount: Option<Decimal>,
    /// Calculated withheld VAT. Set by `calculate_totals()`.
    pub withholding_amount: Option<Decimal>,
}

/// Line discount, given either as a percentage or as an absolute amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Discount {
    /// Percentage of the line gross amount.
    Rate(Decimal),
    /// Absolute amount.
    Amount(Decimal),
}

/// VAT withholding (tevkifat) applied to a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withholding {
    /// GİB withholding code (e.g. "601", "624").
    pub code: String,
    /// Percentage of the VAT that is withheld (e.g. 50, 70, 90).
    pub rate: Decimal,
}

/// VAT exemption reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxExemption {
    /// GİB exemption code (e.g. "301" for export, "351" for non-exempt zero VAT).
    pub code: String,
    /// Reason text.
    pub reason: Option<String>,
}

/// Payment terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTerms {
    /// Payment means.
    pub means: PaymentMeans,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,
    /// Beneficiary IBAN.
    pub iban: Option<String>,
    /// Bank name.
    pub bank_name: Option<String>,
    /// Free-text payment note.
    pub note: Option<String>,
}

/// UNTDID 4461 payment means (subset used on Turkish invoices).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMeans {
    /// 10: Cash.
    Cash,
    /// 20: Cheque.
    Cheque,
    /// 42: Payment to bank account.
    BankTransfer,
    /// 48: Bank card.
    Card,
    /// ZZZ: Other.
    Other,
}

impl PaymentMeans {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Cash => "10",
            Self::Cheque => "20",
            Self::BankTransfer => "42",
            Self::Card => "48",
            Self::Other => "ZZZ",
        }
    }
}

/// Invoice totals (LegalMonetaryTotal + TaxTotal + WithholdingTaxTotal).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of quantity × unit price over all lines.
    pub line_extension: Decimal,
    /// Sum of line discounts.
    pub discount_total: Decimal,
    /// Net amount = line_extension − discount_total.
    pub tax_exclusive: Decimal,
    /// Total VAT.
    pub vat_total: Decimal,
    /// Gross amount = tax_exclusive + vat_total.
    pub tax_inclusive: Decimal,
    /// Total withheld VAT.
    pub withholding_total: Decimal,
    /// Amount payable = tax_inclusive − withholding_total.
    pub payable: Decimal,
    /// VAT breakdown by rate.
    pub vat_breakdown: Vec<VatBreakdown>,
}

/// VAT subtotal per rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VatBreakdown {
    /// VAT rate percentage.
    pub rate: Decimal,
    /// Taxable amount at this rate.
    pub taxable_amount: Decimal,
    /// VAT at this rate.
    pub tax_amount: Decimal,
}

/// e-İrsaliye dispatch note.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispatch {
    /// ETTN.
    pub uuid: Uuid,
    /// GİB document number.
    pub number: Option<String>,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Issue time.
    pub issue_time: Option<NaiveTime>,
    /// Dispatch type.
    pub dispatch_type: DispatchType,
    /// Despatch supplier (the party shipping the goods).
    pub supplier: Party,
    /// Delivery customer.
    pub customer: Party,
    /// Shipment details.
    pub shipment: Shipment,
    /// Dispatch lines.
    pub lines: Vec<DispatchLine>,
    /// Purchase order reference.
    pub order_reference: Option<DocumentReference>,
    /// Free-text notes.
    pub notes: Vec<String>,
}

/// Dispatch type code (DespatchAdviceTypeCode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DispatchType {
    /// Regular shipment.
    Sevk,
    /// Electronic copy of a pre-printed paper dispatch note.
    Matbudan,
}

/// Shipment details of a dispatch note.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    /// Actual shipment date.
    pub shipment_date: NaiveDate,
    /// Actual shipment time.
    pub shipment_time: Option<NaiveTime>,
    /// Carrier company, when goods are shipped by a third party.
    pub carrier: Option<Carrier>,
    /// Drivers.
    pub drivers: Vec<Driver>,
    /// Vehicle licence plate.
    pub vehicle_plate: Option<String>,
    /// Trailer licence plate.
    pub trailer_plate: Option<String>,
    /// Delivery address.
    pub delivery_address: Address,
}

/// Carrier company.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carrier {
    pub name: String,
    /// VKN or TCKN.
    pub tax_id: String,
}

/// Vehicle driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub first_name: String,
    pub last_name: String,
    /// TCKN.
    pub tckn: String,
}

/// Dispatch line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchLine {
    /// Line identifier.
    pub id: String,
    /// Item name.
    pub name: String,
    /// Delivered quantity.
    pub quantity: Decimal,
    /// Unit of measure (UN/ECE Rec 20).
    pub unit: String,
    /// Optional unit price (informational).
    pub unit_price: Option<Decimal>,
    /// Seller's item identifier.
    pub seller_item_id: Option<String>,
}

/// e-Müstahsil makbuzu: receipt issued by a merchant to an agricultural producer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerReceipt {
    /// ETTN.
    pub uuid: Uuid,
    /// GİB document number.
    pub number: Option<String>,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Issue time.
    pub issue_time: Option<NaiveTime>,
    /// Merchant issuing the receipt.
    pub issuer: Party,
    /// Producer (farmer) being paid.
    pub producer: Party,
    /// Receipt lines.
    pub lines: Vec<ReceiptLine>,
    /// Related delivery note.
    pub delivery_reference: Option<DocumentReference>,
    /// Free-text notes.
    pub notes: Vec<String>,
    /// Calculated totals (set by `calculate_receipt_totals()`).
    pub totals: Option<ReceiptTotals>,
}

/// Producer receipt line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    /// Line identifier.
    pub id: String,
    /// Product name.
    pub name: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit of measure (UN/ECE Rec 20).
    pub unit: String,
    /// Unit price.
    pub unit_price: Decimal,
    /// Income tax withholding (stopaj) rate percentage.
    pub withholding_rate: Decimal,
    /// Calculated line amount. Set by `calculate_receipt_totals()`.
    pub line_amount: Option<Decimal>,
    /// Calculated withholding. Set by `calculate_receipt_totals()`.
    pub withholding_amount: Option<Decimal>,
}

/// Producer receipt totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptTotals {
    /// Sum of line amounts.
    pub gross_total: Decimal,
    /// Sum of withholdings.
    pub withholding_total: Decimal,
    /// Amount paid to the producer = gross_total − withholding_total.
    pub net_payable: Decimal,
}

/// Kind of e-document handled by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    Invoice,
    Dispatch,
    ProducerReceipt,
}

impl DocumentKind {
    /// Path segment of the kind's endpoints.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Invoice => "invoices",
            Self::Dispatch => "dispatches",
            Self::ProducerReceipt => "producer-receipts",
        }
    }
}

/// Processing status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Draft,
    Queued,
    Processing,
    Sent,
    Delivered,
    Accepted,
    Rejected,
    Cancelled,
    Failed,
    #[serde(other)]
    Unknown,
}

impl DocumentStatus {
    /// Whether the status will not change any more.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Self::Accepted | Self::Rejected | Self::Cancelled | Self::Failed
        )
    }
}
