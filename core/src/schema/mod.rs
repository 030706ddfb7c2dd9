//! Request and response shapes for every provider operation.
//!
//! Request types validate at construction and are immutable afterwards, so
//! a value that exists is a value the client may send. Field names in errors
//! and on the wire are the provider's own (`add`, `o_pin`, `cgm`, ...).

mod label;
mod order;
mod pickup;
mod pincode;
mod shipping_cost;
mod tracking;
mod validation;
mod warehouse;
mod waybill;

pub use label::{LabelPackage, LabelRequest, LabelResult, PageSize};
pub use order::{
    CancelShipment, Consignee, ConsigneeFields, CreatedPackage, OrderCreated, OrderReference,
    OrderItem, OrderUpdate, OrderUpdateAck, OrderUpdateBuilder, PackageDimensions, PaymentMode,
    ReturnAddress, ReturnAddressFields, Seller, ShipmentOrder, ShipmentOrderBuilder, ShippingMode,
};
pub use pickup::{PickupRequest, PickupResult};
pub use pincode::{Pincode, PincodeQuery, PincodeResult};
pub(crate) use pincode::PincodeWire;
pub use shipping_cost::{
    ChargeBreakdown, DeliveryMode, PaymentType, ShipmentStatus, ShippingCostQuery, TaxBreakdown,
};
pub use tracking::{ScanEvent, ShipmentTrack, TrackingQuery, TrackingResult, TrackingStatus};
pub use validation::ValidationError;
pub use warehouse::{
    WarehouseAck, WarehouseAckData, WarehouseFields, WarehouseSpec, WarehouseUpdate,
    WarehouseUpdateBuilder,
};
pub use waybill::Waybill;
