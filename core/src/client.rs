//! Delhivery API client: request builders, response parsers and the
//! blocking facade that joins them through an `HttpTransport`.
//!
//! # Design
//! Every operation is split into `build_*` (typed input to `HttpRequest`)
//! and `parse_*` (`HttpResponse` to typed output). Both halves are pure, so
//! a caller that wants to own the I/O can use them directly. The facade
//! methods (`check_pincode_serviceability`, `create_order`, ...) check the
//! credential, build, execute one round trip and parse, logging each step.
//! Nothing is retried.

use std::time::Duration;

use tracing::{debug, error, info, info_span};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpBody, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::logging::truncate_body;
use crate::normalize::{ensure_success, parse_json, rejected};
use crate::schema::{
    CancelShipment, ChargeBreakdown, LabelRequest, LabelResult, OrderCreated, OrderUpdate,
    OrderUpdateAck, PickupRequest, PickupResult, PincodeQuery, PincodeResult, PincodeWire,
    ShipmentOrder, ShippingCostQuery, TrackingQuery, TrackingResult, ValidationError,
    WarehouseAck, WarehouseSpec, WarehouseUpdate, Waybill,
};
use crate::transport::UreqTransport;
use crate::xml;

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";
const XML: &str = "application/xml";

/// One remote capability: its path, verb and fixed timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CheckPincode,
    CreateWarehouse,
    UpdateWarehouse,
    ShippingCost,
    CreateOrder,
    UpdateOrder,
    CancelShipment,
    SchedulePickup,
    GenerateLabel,
    TrackShipments,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CheckPincode => "check_pincode_serviceability",
            Operation::CreateWarehouse => "create_warehouse",
            Operation::UpdateWarehouse => "update_warehouse",
            Operation::ShippingCost => "calculate_shipping_cost",
            Operation::CreateOrder => "create_order",
            Operation::UpdateOrder => "update_order",
            Operation::CancelShipment => "cancel_shipment",
            Operation::SchedulePickup => "schedule_pickup",
            Operation::GenerateLabel => "generate_label",
            Operation::TrackShipments => "track_shipments",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Operation::CheckPincode => "/c/api/pin-codes/json/",
            Operation::CreateWarehouse => "/api/backend/clientwarehouse/create/",
            Operation::UpdateWarehouse => "/api/backend/clientwarehouse/edit/",
            Operation::ShippingCost => "/api/kinko/v1/invoice/charges/",
            Operation::CreateOrder => "/api/cmu/create.json",
            Operation::UpdateOrder => "/api/cmu/update.json",
            Operation::CancelShipment => "/api/p/edit",
            Operation::SchedulePickup => "/fm/request/new/",
            Operation::GenerateLabel => "/api/p/packing_slip",
            Operation::TrackShipments => "/api/v1/packages/json/",
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            Operation::CheckPincode
            | Operation::ShippingCost
            | Operation::GenerateLabel
            | Operation::TrackShipments => HttpMethod::Get,
            _ => HttpMethod::Post,
        }
    }

    pub fn timeout(&self) -> Duration {
        let secs = match self {
            Operation::CheckPincode => 10,
            Operation::CreateWarehouse
            | Operation::UpdateWarehouse
            | Operation::ShippingCost
            | Operation::CancelShipment => 15,
            Operation::CreateOrder
            | Operation::UpdateOrder
            | Operation::SchedulePickup
            | Operation::GenerateLabel
            | Operation::TrackShipments => 20,
        };
        Duration::from_secs(secs)
    }

    fn accept(&self) -> &'static str {
        match self {
            Operation::ShippingCost => XML,
            _ => JSON,
        }
    }
}

/// Blocking client for the Delhivery REST API.
///
/// Holds read-only configuration and a transport. A missing credential is
/// reported by the first operation, not at construction.
#[derive(Debug, Clone)]
pub struct DelhiveryClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl DelhiveryClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    /// Configuration from `DELHIVERY_AUTH_TOKEN` / `DELHIVERY_API_BASE_URL`
    /// (and a `.env` file, if present).
    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }
}

impl<T: HttpTransport> DelhiveryClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ---- builders ----

    pub fn build_check_pincode(&self, query: &PincodeQuery) -> Result<HttpRequest, ApiError> {
        self.request(Operation::CheckPincode, query.query_pairs(), None)
    }

    pub fn build_create_warehouse(&self, spec: &WarehouseSpec) -> Result<HttpRequest, ApiError> {
        self.request(Operation::CreateWarehouse, Vec::new(), Some(json(spec)?))
    }

    pub fn build_update_warehouse(&self, update: &WarehouseUpdate) -> Result<HttpRequest, ApiError> {
        self.request(Operation::UpdateWarehouse, Vec::new(), Some(json(update)?))
    }

    pub fn build_shipping_cost(&self, query: &ShippingCostQuery) -> Result<HttpRequest, ApiError> {
        self.request(Operation::ShippingCost, query.query_pairs(), None)
    }

    pub fn build_create_order(&self, order: &ShipmentOrder) -> Result<HttpRequest, ApiError> {
        let form = order.cmu_form()?;
        self.request(Operation::CreateOrder, Vec::new(), Some(HttpBody::Form(form)))
    }

    pub fn build_update_order(&self, update: &OrderUpdate) -> Result<HttpRequest, ApiError> {
        self.request(Operation::UpdateOrder, Vec::new(), Some(json(&update.cmu_document())?))
    }

    pub fn build_cancel_shipment(&self, cancel: &CancelShipment) -> Result<HttpRequest, ApiError> {
        self.request(Operation::CancelShipment, Vec::new(), Some(json(cancel)?))
    }

    pub fn build_schedule_pickup(&self, pickup: &PickupRequest) -> Result<HttpRequest, ApiError> {
        self.request(Operation::SchedulePickup, Vec::new(), Some(json(pickup)?))
    }

    pub fn build_generate_label(&self, label: &LabelRequest) -> Result<HttpRequest, ApiError> {
        self.request(Operation::GenerateLabel, label.query_pairs(), None)
    }

    pub fn build_track_shipments(&self, query: &TrackingQuery) -> Result<HttpRequest, ApiError> {
        self.request(Operation::TrackShipments, query.query_pairs(), None)
    }

    // ---- parsers ----

    pub fn parse_check_pincode(
        &self,
        query: &PincodeQuery,
        response: &HttpResponse,
    ) -> Result<PincodeResult, ApiError> {
        let wire: PincodeWire = parse_json(response)?;
        Ok(PincodeResult::from_wire(query.pincode(), wire))
    }

    /// `success: false` in a 2xx body is a rejection.
    pub fn parse_warehouse_ack(&self, response: &HttpResponse) -> Result<WarehouseAck, ApiError> {
        let ack: WarehouseAck = parse_json(response)?;
        if !ack.success {
            return Err(rejected(response));
        }
        Ok(ack)
    }

    pub fn parse_shipping_cost(&self, response: &HttpResponse) -> Result<ChargeBreakdown, ApiError> {
        ensure_success(response)?;
        xml::parse_charge_breakdown(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// A partially failed upload is a rejection: the body lists which
    /// packages failed and why.
    pub fn parse_create_order(&self, response: &HttpResponse) -> Result<OrderCreated, ApiError> {
        let created: OrderCreated = parse_json(response)?;
        if !created.is_complete() {
            return Err(rejected(response));
        }
        Ok(created)
    }

    pub fn parse_update_order(&self, response: &HttpResponse) -> Result<OrderUpdateAck, ApiError> {
        let ack: OrderUpdateAck = parse_json(response)?;
        if !ack.status {
            return Err(rejected(response));
        }
        Ok(ack)
    }

    /// Cancellation has no result. An acknowledgement with `status: false`
    /// is still a rejection; any other 2xx body is accepted.
    pub fn parse_cancel_shipment(&self, response: &HttpResponse) -> Result<(), ApiError> {
        ensure_success(response)?;
        match serde_json::from_str::<OrderUpdateAck>(&response.body) {
            Ok(ack) if !ack.status => Err(rejected(response)),
            _ => Ok(()),
        }
    }

    pub fn parse_schedule_pickup(&self, response: &HttpResponse) -> Result<PickupResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_generate_label(&self, response: &HttpResponse) -> Result<LabelResult, ApiError> {
        let label: LabelResult = parse_json(response)?;
        if label.packages.is_empty() {
            return Err(rejected(response));
        }
        Ok(label)
    }

    pub fn parse_track_shipments(&self, response: &HttpResponse) -> Result<TrackingResult, ApiError> {
        parse_json(response)
    }

    // ---- facade ----

    /// Whether the provider delivers to `pincode`. The pincode is validated
    /// here, after the credential check and before any request is sent.
    pub fn check_pincode_serviceability(&self, pincode: &str) -> Result<PincodeResult, ApiError> {
        let span = info_span!("delhivery", operation = Operation::CheckPincode.name(), pincode);
        let _enter = span.enter();
        self.run(Operation::CheckPincode, || {
            let query = PincodeQuery::new(pincode)?;
            let response = self.send(self.build_check_pincode(&query)?)?;
            self.parse_check_pincode(&query, &response)
        })
    }

    pub fn create_warehouse(&self, spec: &WarehouseSpec) -> Result<WarehouseAck, ApiError> {
        let span = info_span!("delhivery", operation = Operation::CreateWarehouse.name(), warehouse = spec.name());
        let _enter = span.enter();
        self.run(Operation::CreateWarehouse, || {
            let response = self.send(self.build_create_warehouse(spec)?)?;
            self.parse_warehouse_ack(&response)
        })
    }

    pub fn update_warehouse(&self, update: &WarehouseUpdate) -> Result<WarehouseAck, ApiError> {
        let span = info_span!("delhivery", operation = Operation::UpdateWarehouse.name(), warehouse = update.name());
        let _enter = span.enter();
        self.run(Operation::UpdateWarehouse, || {
            let response = self.send(self.build_update_warehouse(update)?)?;
            self.parse_warehouse_ack(&response)
        })
    }

    pub fn calculate_shipping_cost(&self, query: &ShippingCostQuery) -> Result<ChargeBreakdown, ApiError> {
        let span = info_span!(
            "delhivery",
            operation = Operation::ShippingCost.name(),
            origin = %query.origin(),
            destination = %query.destination(),
            cgm = query.chargeable_weight_grams(),
        );
        let _enter = span.enter();
        self.run(Operation::ShippingCost, || {
            let response = self.send(self.build_shipping_cost(query)?)?;
            self.parse_shipping_cost(&response)
        })
    }

    pub fn create_order(&self, order: &ShipmentOrder) -> Result<OrderCreated, ApiError> {
        let span = info_span!("delhivery", operation = Operation::CreateOrder.name(), order = %order.order());
        let _enter = span.enter();
        self.run(Operation::CreateOrder, || {
            let response = self.send(self.build_create_order(order)?)?;
            let created = self.parse_create_order(&response)?;
            info!(waybills = ?created.waybills(), "shipment manifested");
            Ok(created)
        })
    }

    pub fn update_order(&self, update: &OrderUpdate) -> Result<OrderUpdateAck, ApiError> {
        let span = info_span!("delhivery", operation = Operation::UpdateOrder.name(), order = %update.order());
        let _enter = span.enter();
        self.run(Operation::UpdateOrder, || {
            let response = self.send(self.build_update_order(update)?)?;
            self.parse_update_order(&response)
        })
    }

    pub fn cancel_shipment(&self, waybill: &Waybill) -> Result<(), ApiError> {
        let span = info_span!("delhivery", operation = Operation::CancelShipment.name(), waybill = %waybill);
        let _enter = span.enter();
        self.run(Operation::CancelShipment, || {
            let cancel = CancelShipment::new(waybill.clone());
            let response = self.send(self.build_cancel_shipment(&cancel)?)?;
            self.parse_cancel_shipment(&response)
        })
    }

    pub fn schedule_pickup(&self, pickup: &PickupRequest) -> Result<PickupResult, ApiError> {
        let span = info_span!(
            "delhivery",
            operation = Operation::SchedulePickup.name(),
            pickup_location = pickup.pickup_location(),
            pickup_date = %pickup.pickup_date(),
        );
        let _enter = span.enter();
        self.run(Operation::SchedulePickup, || {
            let response = self.send(self.build_schedule_pickup(pickup)?)?;
            let result = self.parse_schedule_pickup(&response)?;
            info!(pickup_id = result.pickup_id, "pickup scheduled");
            Ok(result)
        })
    }

    pub fn generate_label(&self, label: &LabelRequest) -> Result<LabelResult, ApiError> {
        let span = info_span!(
            "delhivery",
            operation = Operation::GenerateLabel.name(),
            waybills = label.waybills().len(),
            pdf = label.wants_pdf(),
        );
        let _enter = span.enter();
        self.run(Operation::GenerateLabel, || {
            let response = self.send(self.build_generate_label(label)?)?;
            self.parse_generate_label(&response)
        })
    }

    pub fn track_shipments(&self, query: &TrackingQuery) -> Result<TrackingResult, ApiError> {
        let span = info_span!(
            "delhivery",
            operation = Operation::TrackShipments.name(),
            waybills = query.waybills().len(),
            ref_ids = query.ref_ids().len(),
        );
        let _enter = span.enter();
        self.run(Operation::TrackShipments, || {
            let response = self.send(self.build_track_shipments(query)?)?;
            self.parse_track_shipments(&response)
        })
    }

    // ---- plumbing ----

    fn request(
        &self,
        operation: Operation,
        query: Vec<(String, String)>,
        body: Option<HttpBody>,
    ) -> Result<HttpRequest, ApiError> {
        let token = self.config.auth_token()?;
        let mut headers = vec![
            ("Authorization".to_string(), format!("Token {token}")),
            ("Accept".to_string(), operation.accept().to_string()),
        ];
        let content_type = match &body {
            Some(HttpBody::Form(_)) => FORM,
            _ => JSON,
        };
        headers.push(("Content-Type".to_string(), content_type.to_string()));
        Ok(HttpRequest {
            method: operation.method(),
            url: format!("{}{}", self.config.base_url(), operation.path()),
            query,
            headers,
            body,
            timeout: operation.timeout(),
        })
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(
            method = request.method.as_str(),
            url = %request.url,
            query = ?request.query,
            "sending request"
        );
        let response = self.transport.execute(&request)?;
        debug!(
            status = response.status,
            body = truncate_body(&response.body),
            "response received"
        );
        Ok(response)
    }

    fn run<R>(
        &self,
        operation: Operation,
        call: impl FnOnce() -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        info!(path = operation.path(), "request started");
        let result = self.config.auth_token().map_err(ApiError::from).and_then(|_| call());
        match &result {
            Ok(_) => info!("request succeeded"),
            Err(ApiError::Http { status, body }) => {
                error!(status, body = truncate_body(body), "provider rejected request")
            }
            Err(ApiError::Network(transport)) => {
                error!(timed_out = transport.is_timeout(), error = %transport, "transport failure")
            }
            Err(err) => error!(error = %err, "request failed"),
        }
        result
    }
}

fn json<S: serde::Serialize>(value: &S) -> Result<HttpBody, ValidationError> {
    serde_json::to_string(value)
        .map(HttpBody::Json)
        .map_err(|e| ValidationError::Encoding {
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;

    use super::*;
    use crate::schema::{
        ConsigneeFields, DeliveryMode, OrderReference, PageSize, PaymentType, ShipmentStatus,
        WarehouseFields,
    };

    fn client() -> DelhiveryClient<UreqTransport> {
        DelhiveryClient::new(ClientConfig::with_token("secret").with_base_url("http://localhost:3000/"))
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn wbn() -> Waybill {
        Waybill::new("1234567890123").unwrap()
    }

    #[test]
    fn pincode_request_uses_filter_codes_and_token() {
        let req = client()
            .build_check_pincode(&PincodeQuery::new("560001").unwrap())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/c/api/pin-codes/json/");
        assert_eq!(req.query_param("filter_codes"), Some("560001"));
        assert_eq!(req.header("authorization"), Some("Token secret"));
        assert_eq!(req.timeout, Duration::from_secs(10));
        assert!(req.body.is_none());
    }

    #[test]
    fn builders_need_a_credential() {
        let client = DelhiveryClient::new(ClientConfig::without_credential());
        let err = client
            .build_check_pincode(&PincodeQuery::new("560001").unwrap())
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn warehouse_create_posts_json() {
        let spec = WarehouseSpec::new(WarehouseFields {
            name: "BLR-Main".to_string(),
            registered_name: "Acme".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pin: "560001".to_string(),
            phone: "9876543210".to_string(),
            email: "ops@acme.in".to_string(),
            return_address: "12 MG Road".to_string(),
            return_city: "Bengaluru".to_string(),
            return_state: "Karnataka".to_string(),
            return_pin: "560001".to_string(),
            ..WarehouseFields::default()
        })
        .unwrap();
        let req = client().build_create_warehouse(&spec).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert!(req.url.ends_with("/api/backend/clientwarehouse/create/"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(req.json_body().unwrap()).unwrap();
        assert_eq!(body["name"], "BLR-Main");
        assert_eq!(body["return_pin"], "560001");
    }

    #[test]
    fn shipping_cost_is_a_get_accepting_xml() {
        let query = ShippingCostQuery::new(
            DeliveryMode::Express,
            1200,
            "560001",
            "110001",
            ShipmentStatus::Delivered,
            PaymentType::Prepaid,
        )
        .unwrap();
        let req = client().build_shipping_cost(&query).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.header("accept"), Some("application/xml"));
        assert_eq!(req.query_param("pt"), Some("Pre-paid"));
        assert_eq!(req.query_param("cgm"), Some("1200"));
    }

    #[test]
    fn create_order_sends_cmu_form() {
        let order = ShipmentOrder::builder(
            OrderReference::new("ORD-1").unwrap(),
            ConsigneeFields {
                name: "Asha".to_string(),
                address: "4 Residency Road".to_string(),
                pin: "560025".to_string(),
                city: "Bengaluru".to_string(),
                state: "Karnataka".to_string(),
                country: None,
                phone: "9876543210".to_string(),
            },
            "BLR-Main",
        )
        .declared_value(Decimal::from(250))
        .build()
        .unwrap();
        let req = client().build_create_order(&order).unwrap();
        assert_eq!(req.header("content-type"), Some("application/x-www-form-urlencoded"));
        assert_eq!(req.timeout, Duration::from_secs(20));
        let form = req.form_body().unwrap();
        assert_eq!(form[0], ("format".to_string(), "json".to_string()));
        let data: serde_json::Value = serde_json::from_str(&form[1].1).unwrap();
        assert_eq!(data["pickup_location"]["name"], "BLR-Main");
    }

    #[test]
    fn update_goes_to_cmu_and_cancel_to_the_edit_path() {
        let cancel = client()
            .build_cancel_shipment(&CancelShipment::new(wbn()))
            .unwrap();
        assert!(cancel.url.ends_with("/api/p/edit"));
        assert_eq!(cancel.timeout, Duration::from_secs(15));

        let update = OrderUpdate::builder(OrderReference::new("ORD-1").unwrap())
            .name("Asha R")
            .build()
            .unwrap();
        let req = client().build_update_order(&update).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert!(req.url.ends_with("/api/cmu/update.json"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.timeout, Duration::from_secs(20));
        let body: serde_json::Value = serde_json::from_str(req.json_body().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"shipments": [{"order": "ORD-1", "name": "Asha R"}]}));
    }

    #[test]
    fn label_and_tracking_are_query_based() {
        let label = client()
            .build_generate_label(&LabelRequest::new(vec![wbn()]).unwrap().pdf(Some(PageSize::A4)))
            .unwrap();
        assert_eq!(label.query_param("wbns"), Some("1234567890123"));
        assert_eq!(label.query_param("pdf_size"), Some("A4"));

        let track = client()
            .build_track_shipments(&TrackingQuery::new(vec![wbn()]).unwrap())
            .unwrap();
        assert_eq!(track.method, HttpMethod::Get);
        assert_eq!(track.query_param("waybill"), Some("1234567890123"));
    }

    #[test]
    fn pickup_body_uses_provider_formats() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let pickup = PickupRequest::new_on(today, today, NaiveTime::from_hms_opt(14, 30, 0).unwrap(), "BLR-Main", 4)
            .unwrap();
        let req = client().build_schedule_pickup(&pickup).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.json_body().unwrap()).unwrap();
        assert_eq!(body["pickup_time"], "14:30:00");
        assert_eq!(body["expected_package_count"], 4);
    }

    #[test]
    fn warehouse_ack_with_success_false_is_rejected() {
        let body = r#"{"success":false,"error":["Warehouse name already exists"]}"#;
        let err = client().parse_warehouse_ack(&response(200, body)).unwrap_err();
        assert_eq!(err.status(), Some(200));
        assert_eq!(err.body(), Some(body));
    }

    #[test]
    fn partially_failed_upload_is_rejected() {
        let body = r#"{"success":true,"packages":[{"status":"Fail","remarks":"bad pin"}]}"#;
        let err = client().parse_create_order(&response(200, body)).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 200, .. }));
    }

    #[test]
    fn cancel_accepts_any_success_body_but_refusals() {
        assert!(client().parse_cancel_shipment(&response(200, "")).is_ok());
        assert!(client()
            .parse_cancel_shipment(&response(200, r#"{"status":true,"remark":"cancelled"}"#))
            .is_ok());
        assert!(client()
            .parse_cancel_shipment(&response(200, r#"{"status":false,"error":"already delivered"}"#))
            .is_err());
        assert!(matches!(
            client().parse_cancel_shipment(&response(404, "not found")).unwrap_err(),
            ApiError::Http { status: 404, .. }
        ));
    }

    #[test]
    fn shipping_cost_xml_errors_are_decode_errors() {
        let err = client()
            .parse_shipping_cost(&response(200, r#"{"total_amount": 10}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        let err = client()
            .parse_shipping_cost(&response(500, "<error/>"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 500, .. }));
    }

    #[test]
    fn empty_label_result_is_rejected() {
        let err = client()
            .parse_generate_label(&response(200, r#"{"packages":[],"packages_found":0}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 200, .. }));
    }

    #[test]
    fn every_operation_has_a_distinct_name() {
        let ops = [
            Operation::CheckPincode,
            Operation::CreateWarehouse,
            Operation::UpdateWarehouse,
            Operation::ShippingCost,
            Operation::CreateOrder,
            Operation::UpdateOrder,
            Operation::CancelShipment,
            Operation::SchedulePickup,
            Operation::GenerateLabel,
            Operation::TrackShipments,
        ];
        let mut names: Vec<_> = ops.iter().map(Operation::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ops.len());
    }
}
