use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::builder::check_limits;
use super::error::{EtsError, join_errors};
use super::types::*;
use super::validation;

/// Builder for e-İrsaliye dispatch notes.
///
/// ```
/// use ets::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let dispatch = DispatchBuilder::new(day, day)
///     .supplier(PartyBuilder::new("ACME A.Ş.", "1234567890", AddressBuilder::new("Bursa").build()).build())
///     .customer(PartyBuilder::new("Depo Ltd.", "9876543217", AddressBuilder::new("Ankara").build()).build())
///     .delivery_address(AddressBuilder::new("Ankara").district("Sincan").build())
///     .driver("Ali", "Yılmaz", "10000000146")
///     .vehicle_plate("34 ABC 123")
///     .add_line(DispatchLineBuilder::new("1", "Palet", dec!(4), "C62").build())
///     .build();
/// assert!(dispatch.is_ok());
/// ```
pub struct DispatchBuilder {
    uuid: Option<Uuid>,
    number: Option<String>,
    issue_date: NaiveDate,
    issue_time: Option<NaiveTime>,
    dispatch_type: DispatchType,
    supplier: Option<Party>,
    customer: Option<Party>,
    shipment_date: NaiveDate,
    shipment_time: Option<NaiveTime>,
    carrier: Option<Carrier>,
    drivers: Vec<Driver>,
    vehicle_plate: Option<String>,
    trailer_plate: Option<String>,
    delivery_address: Option<Address>,
    lines: Vec<DispatchLine>,
    order_reference: Option<DocumentReference>,
    notes: Vec<String>,
}

impl DispatchBuilder {
    pub fn new(issue_date: NaiveDate, shipment_date: NaiveDate) -> Self {
        Self {
            uuid: None,
            number: None,
            issue_date,
            issue_time: None,
            dispatch_type: DispatchType::Sevk,
            supplier: None,
            customer: None,
            shipment_date,
            shipment_time: None,
            carrier: None,
            drivers: Vec::new(),
            vehicle_plate: None,
            trailer_plate: None,
            delivery_address: None,
            lines: Vec::new(),
            order_reference: None,
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

    pub fn dispatch_type(mut self, dispatch_type: DispatchType) -> Self {
        self.dispatch_type = dispatch_type;
        self
    }

    pub fn supplier(mut self, party: Party) -> Self {
        self.supplier = Some(party);
        self
    }

    pub fn customer(mut self, party: Party) -> Self {
        self.customer = Some(party);
        self
    }

    pub fn shipment_time(mut self, time: NaiveTime) -> Self {
        self.shipment_time = Some(time);
        self
    }

    pub fn carrier(mut self, name: impl Into<String>, tax_id: impl Into<String>) -> Self {
        self.carrier = Some(Carrier {
            name: name.into(),
            tax_id: tax_id.into(),
        });
        self
    }

    pub fn driver(
        mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        tckn: impl Into<String>,
    ) -> Self {
        self.drivers.push(Driver {
            first_name: first_name.into(),
            last_name: last_name.into(),
            tckn: tckn.into(),
        });
        self
    }

    pub fn vehicle_plate(mut self, plate: impl Into<String>) -> Self {
        self.vehicle_plate = Some(plate.into());
        self
    }

    pub fn trailer_plate(mut self, plate: impl Into<String>) -> Self {
        self.trailer_plate = Some(plate.into());
        self
    }

    /// Delivery address; defaults to the customer's address.
    pub fn delivery_address(mut self, address: Address) -> Self {
        self.delivery_address = Some(address);
        self
    }

    pub fn add_line(mut self, line: DispatchLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn order_reference(mut self, id: impl Into<String>, date: Option<NaiveDate>) -> Self {
        self.order_reference = Some(DocumentReference {
            id: id.into(),
            issue_date: date,
        });
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    fn assemble(self) -> Result<Dispatch, EtsError> {
        let supplier = self
            .supplier
            .ok_or_else(|| EtsError::Builder("supplier is required".into()))?;
        let customer = self
            .customer
            .ok_or_else(|| EtsError::Builder("customer is required".into()))?;
        let delivery_address = self
            .delivery_address
            .unwrap_or_else(|| customer.address.clone());

        Ok(Dispatch {
            uuid: self.uuid.unwrap_or_else(Uuid::new_v4),
            number: self.number,
            issue_date: self.issue_date,
            issue_time: self.issue_time,
            dispatch_type: self.dispatch_type,
            supplier,
            customer,
            shipment: Shipment {
                shipment_date: self.shipment_date,
                shipment_time: self.shipment_time,
                carrier: self.carrier,
                drivers: self.drivers,
                vehicle_plate: self.vehicle_plate,
                trailer_plate: self.trailer_plate,
                delivery_address,
            },
            lines: self.lines,
            order_reference: self.order_reference,
            notes: self.notes,
        })
    }

    /// Build the dispatch note and run validation.
    pub fn build(self) -> Result<Dispatch, EtsError> {
        if self.lines.is_empty() {
            return Err(EtsError::Builder(
                "at least one dispatch line is required".into(),
            ));
        }
        check_limits(self.lines.len(), self.notes.len())?;

        let dispatch = self.assemble()?;
        let errors = validation::validate_dispatch(&dispatch);
        if !errors.is_empty() {
            return Err(join_errors(&errors));
        }
        Ok(dispatch)
    }

    /// Build without validation.
    pub fn build_unchecked(self) -> Result<Dispatch, EtsError> {
        self.assemble()
    }
}

/// Builder for DispatchLine.
pub struct DispatchLineBuilder {
    id: String,
    name: String,
    quantity: Decimal,
    unit: String,
    unit_price: Option<Decimal>,
    seller_item_id: Option<String>,
}

impl DispatchLineBuilder {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            unit: unit.into(),
            unit_price: None,
            seller_item_id: None,
        }
    }

    pub fn unit_price(mut self, price: Decimal) -> Self {
        self.unit_price = Some(price);
        self
    }

    pub fn seller_item_id(mut self, id: impl Into<String>) -> Self {
        self.seller_item_id = Some(id.into());
        self
    }

    pub fn build(self) -> DispatchLine {
        DispatchLine {
            id: self.id,
            name: self.name,
            quantity: self.quantity,
            unit: self.unit,
            unit_price: self.unit_price,
            seller_item_id: self.seller_item_id,
        }
    }
}
