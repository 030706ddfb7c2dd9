//! In-memory stand-in for the Delhivery REST API.
//!
//! Serves the endpoints `delhivery-core` calls with deterministic, canned
//! behaviour: a fixed table of serviceable pincodes, a warehouse registry,
//! rate-card pricing rendered as XML, CMU order creation with waybill
//! assignment, order updates, edits, cancellation, pickups, labels and
//! tracking. Every route requires an `Authorization: Token <x>` header.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Timestamp stamped on every scan and status the mock reports.
pub const SCAN_TIME: &str = "2024-03-15T11:02:33";

/// First waybill handed out; later ones count up from here.
pub const FIRST_WAYBILL: u64 = 1_000_000_000_001;

const FIRST_PICKUP_ID: u64 = 7_780;

/// A pincode the mock knows how to deliver to.
#[derive(Debug, Clone, Copy)]
pub struct ServiceablePin {
    pub pin: &'static str,
    pub city: &'static str,
    pub district: &'static str,
    pub state_code: &'static str,
    pub center: &'static str,
    pub cod: bool,
    pub oda: bool,
}

pub const SERVICEABLE_PINS: &[ServiceablePin] = &[
    ServiceablePin {
        pin: "560001",
        city: "Bengaluru",
        district: "Bangalore",
        state_code: "KA",
        center: "IND560001AAA",
        cod: true,
        oda: false,
    },
    ServiceablePin {
        pin: "560025",
        city: "Bengaluru",
        district: "Bangalore",
        state_code: "KA",
        center: "IND560025AAB",
        cod: true,
        oda: false,
    },
    ServiceablePin {
        pin: "110001",
        city: "New Delhi",
        district: "Central Delhi",
        state_code: "DL",
        center: "IND110037AAB",
        cod: true,
        oda: false,
    },
    ServiceablePin {
        pin: "400001",
        city: "Mumbai",
        district: "Mumbai",
        state_code: "MH",
        center: "IND400072AAA",
        cod: true,
        oda: false,
    },
    ServiceablePin {
        pin: "781001",
        city: "Guwahati",
        district: "Kamrup Metro",
        state_code: "AS",
        center: "IND781018AAA",
        cod: false,
        oda: true,
    },
];

pub fn serviceable(pin: &str) -> Option<&'static ServiceablePin> {
    SERVICEABLE_PINS.iter().find(|p| p.pin == pin)
}

#[derive(Debug, Clone, Serialize)]
pub struct Shipment {
    pub waybill: String,
    pub order: String,
    pub pickup_location: String,
    pub fields: Map<String, Value>,
    pub cancelled: bool,
}

#[derive(Debug)]
pub struct Store {
    pub warehouses: HashMap<String, Map<String, Value>>,
    pub shipments: HashMap<String, Shipment>,
    /// Order reference to waybill.
    pub orders: HashMap<String, String>,
    next_waybill: u64,
    next_pickup: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            warehouses: HashMap::new(),
            shipments: HashMap::new(),
            orders: HashMap::new(),
            next_waybill: FIRST_WAYBILL,
            next_pickup: FIRST_PICKUP_ID,
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with(Db::default())
}

/// Router over an existing store, so tests can seed or inspect it.
pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/c/api/pin-codes/json/", get(pincodes))
        .route("/api/backend/clientwarehouse/create/", post(create_warehouse))
        .route("/api/backend/clientwarehouse/edit/", post(edit_warehouse))
        .route("/api/kinko/v1/invoice/charges/", get(invoice_charges))
        .route("/api/cmu/create.json", post(create_shipments))
        .route("/api/cmu/update.json", post(update_shipments))
        .route("/api/p/edit", post(edit_package))
        .route("/fm/request/new/", post(create_pickup))
        .route("/api/p/packing_slip", get(packing_slip))
        .route("/api/v1/packages/json/", get(track))
        .layer(middleware::from_fn(require_token))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_token(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Token "))
        .is_some_and(|token| !token.trim().is_empty());
    if !authorized {
        tracing::warn!(path = %request.uri().path(), "rejected unauthenticated request");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Authentication credentials were not provided."})),
        )
            .into_response();
    }
    next.run(request).await
}

type Params = Query<HashMap<String, String>>;

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({"success": false, "error": message}))).into_response()
}

fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn flag(on: bool) -> &'static str {
    if on {
        "Y"
    } else {
        "N"
    }
}

// ---- pincodes ----

async fn pincodes(Query(params): Params) -> Response {
    let Some(pin) = params.get("filter_codes") else {
        return bad_request("filter_codes is required");
    };
    let codes: Vec<Value> = serviceable(pin)
        .map(|p| {
            json!({"postal_code": {
                "pin": p.pin.parse::<u64>().unwrap_or_default(),
                "city": p.city,
                "district": p.district,
                "state_code": p.state_code,
                "country_code": "IN",
                "cod": flag(p.cod),
                "cash": flag(p.cod),
                "pre_paid": "Y",
                "pickup": "Y",
                "repl": "Y",
                "is_oda": flag(p.oda),
                "center": [{"code": p.center, "cn": format!("{}_Hub", p.city)}],
            }})
        })
        .into_iter()
        .collect();
    Json(json!({"delivery_codes": codes})).into_response()
}

// ---- warehouses ----

const WAREHOUSE_REQUIRED: &[&str] = &["name", "address", "pin", "phone"];

async fn create_warehouse(State(db): State<Db>, Json(body): Json<Map<String, Value>>) -> Response {
    if let Some(missing) = WAREHOUSE_REQUIRED.iter().find(|k| text(&body, k).is_none()) {
        return bad_request(&format!("{missing} is required"));
    }
    let name = text(&body, "name").unwrap_or_default();
    let mut store = db.write().await;
    if store.warehouses.contains_key(&name) {
        return Json(json!({
            "success": false,
            "data": null,
            "error": [format!("Warehouse with name {name} already exists")],
        }))
        .into_response();
    }
    store.warehouses.insert(name.clone(), body);
    tracing::info!(%name, "warehouse registered");
    Json(json!({
        "success": true,
        "data": {"name": name, "message": "Warehouse created"},
        "error": null,
    }))
    .into_response()
}

async fn edit_warehouse(State(db): State<Db>, Json(body): Json<Map<String, Value>>) -> Response {
    let Some(name) = text(&body, "name") else {
        return bad_request("name is required");
    };
    let mut store = db.write().await;
    let Some(existing) = store.warehouses.get_mut(&name) else {
        return Json(json!({"success": false, "error": "ClientWarehouse matching query does not exist."}))
            .into_response();
    };
    for (key, value) in body {
        existing.insert(key, value);
    }
    Json(json!({
        "success": true,
        "data": {"name": name, "message": "Warehouse updated"},
        "error": null,
    }))
    .into_response()
}

// ---- invoice charges ----

const CHARGE_PARAMS: &[&str] = &["md", "cgm", "o_pin", "d_pin", "ss", "pt"];

/// Amount in paise as rupees with two decimals.
fn rupees(paise: u64) -> String {
    format!("{}.{:02}", paise / 100, paise % 100)
}

async fn invoice_charges(Query(params): Params) -> Response {
    if let Some(missing) = CHARGE_PARAMS.iter().find(|k| !params.contains_key(**k)) {
        return bad_request(&format!("{missing} is required"));
    }
    let Ok(grams) = params["cgm"].parse::<u64>() else {
        return bad_request("cgm must be an integer");
    };
    let (origin, destination) = (&params["o_pin"], &params["d_pin"]);
    if serviceable(origin).is_none() || serviceable(destination).is_none() {
        return bad_request("pincode not serviceable");
    }

    let slabs = grams.div_ceil(500).max(1);
    let rate = if params["md"] == "E" { 4_500 } else { 3_000 };
    let freight = slabs * rate;
    let fuel = freight / 10;
    let cod = if params["pt"] == "COD" { 3_500 } else { 0 };
    let gross = freight + fuel + cod;
    let igst = gross * 18 / 100;
    let zone = if origin[..2] == destination[..2] {
        "A"
    } else if origin[..1] == destination[..1] {
        "B"
    } else {
        "D"
    };

    let xml = format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<root>
  <list-item>
    <charge_DL>{dl}</charge_DL>
    <charge_FSC>{fsc}</charge_FSC>
    <charge_COD>{cod}</charge_COD>
    <charge_RTO>0.00</charge_RTO>
    <gross_amount>{gross}</gross_amount>
    <total_amount>{total}</total_amount>
    <charged_weight>{weight}</charged_weight>
    <zone>{zone}</zone>
    <status>{status}</status>
    <tax_data>
      <IGST>{igst}</IGST>
      <CGST>0.00</CGST>
      <SGST>0.00</SGST>
      <service_tax>0.00</service_tax>
      <swacch_bharat_tax>0.00</swacch_bharat_tax>
      <krishi_kalyan_cess>0.00</krishi_kalyan_cess>
    </tax_data>
  </list-item>
</root>"#,
        dl = rupees(freight),
        fsc = rupees(fuel),
        cod = rupees(cod),
        gross = rupees(gross),
        total = rupees(gross + igst),
        weight = slabs * 500,
        status = params["ss"],
        igst = rupees(igst),
    );
    ([(header::CONTENT_TYPE, "application/xml")], xml).into_response()
}

// ---- CMU order creation ----

#[derive(Deserialize)]
struct CmuForm {
    format: String,
    data: String,
}

#[derive(Deserialize)]
struct CmuData {
    #[serde(default)]
    shipments: Vec<Map<String, Value>>,
    pickup_location: Option<PickupLocation>,
}

#[derive(Deserialize)]
struct PickupLocation {
    name: String,
}

async fn create_shipments(State(db): State<Db>, Form(form): Form<CmuForm>) -> Response {
    if form.format != "json" {
        return bad_request("format must be json");
    }
    let Ok(data) = serde_json::from_str::<CmuData>(&form.data) else {
        return bad_request("data is not a valid shipments document");
    };
    let mut store = db.write().await;
    let location = data.pickup_location.map(|p| p.name).unwrap_or_default();
    if !store.warehouses.contains_key(&location) {
        return Json(json!({
            "success": false,
            "package_count": 0,
            "packages": [],
            "rmk": "ClientWarehouse matching query does not exist.",
        }))
        .into_response();
    }

    let mut packages = Vec::new();
    let (mut prepaid, mut cod_count) = (0u32, 0u32);
    let mut cod_total = 0f64;
    for shipment in data.shipments {
        let order = text(&shipment, "order").unwrap_or_default();
        let pin = text(&shipment, "pin").unwrap_or_default();
        let payment = text(&shipment, "payment_mode").unwrap_or_default();
        let cod_amount: f64 = text(&shipment, "cod_amount")
            .and_then(|a| a.parse().ok())
            .unwrap_or(0.0);

        let failure = if order.is_empty() {
            Some("order is required")
        } else if store.orders.contains_key(&order) {
            Some("Duplicate order id")
        } else if serviceable(&pin).is_none() {
            Some("Non serviceable pincode")
        } else {
            None
        };
        if let Some(remark) = failure {
            packages.push(json!({
                "status": "Fail", "waybill": "", "refnum": order, "client": "ACME",
                "remarks": [remark], "cod_amount": 0, "payment": payment, "serviceable": false,
            }));
            continue;
        }

        let waybill = format!("{:013}", store.next_waybill);
        store.next_waybill += 1;
        store.orders.insert(order.clone(), waybill.clone());
        store.shipments.insert(
            waybill.clone(),
            Shipment {
                waybill: waybill.clone(),
                order: order.clone(),
                pickup_location: location.clone(),
                fields: shipment,
                cancelled: false,
            },
        );
        let wire_payment = if payment == "COD" {
            cod_count += 1;
            cod_total += cod_amount;
            "COD"
        } else {
            prepaid += 1;
            "Pre-paid"
        };
        tracing::info!(%waybill, %order, "shipment manifested");
        packages.push(json!({
            "status": "Success", "waybill": waybill, "refnum": order, "client": "ACME",
            "remarks": [], "cod_amount": cod_amount, "payment": wire_payment,
            "serviceable": true, "sort_code": "BLR/MGR",
        }));
    }

    let success = packages.iter().all(|p| p["status"] == "Success");
    Json(json!({
        "success": success,
        "upload_wbn": format!("UPL{}", store.next_waybill),
        "package_count": packages.len(),
        "packages": packages,
        "cod_amount": cod_total,
        "prepaid_count": prepaid,
        "cod_count": cod_count,
        "pickups_count": 0,
        "replacement_count": 0,
        "cash_pickups_count": 0,
        "cash_pickups": 0,
    }))
    .into_response()
}

// ---- CMU order update ----

#[derive(Deserialize)]
struct CmuUpdate {
    #[serde(default)]
    shipments: Vec<Map<String, Value>>,
}

/// Applies the first shipment of the document to the order it names.
async fn update_shipments(State(db): State<Db>, Json(body): Json<CmuUpdate>) -> Response {
    let Some(update) = body.shipments.into_iter().next() else {
        return bad_request("shipments must hold one update");
    };
    let Some(order) = text(&update, "order") else {
        return bad_request("order is required");
    };
    let mut store = db.write().await;
    let Some(waybill) = store.orders.get(&order).cloned() else {
        return Json(json!({"status": false, "order_id": order, "error": "Order id not found"}))
            .into_response();
    };
    if text(&update, "waybill").is_some_and(|w| w != waybill) {
        return Json(json!({
            "status": false, "order_id": order, "waybill": waybill,
            "error": "Waybill does not belong to order",
        }))
        .into_response();
    }
    let Some(shipment) = store.shipments.get_mut(&waybill) else {
        return Json(json!({"status": false, "order_id": order, "error": "Order id not found"}))
            .into_response();
    };
    if shipment.cancelled {
        return Json(json!({
            "status": false, "order_id": order, "waybill": waybill,
            "error": "Cannot edit a cancelled shipment",
        }))
        .into_response();
    }
    for (key, value) in update {
        if key != "order" && key != "waybill" {
            shipment.fields.insert(key, value);
        }
    }
    tracing::info!(%waybill, %order, "order updated");
    Json(json!({
        "status": true, "waybill": waybill, "order_id": order,
        "remark": "Order details updated",
    }))
    .into_response()
}

// ---- package edit and cancellation ----

async fn edit_package(State(db): State<Db>, Json(body): Json<Map<String, Value>>) -> Response {
    let Some(waybill) = text(&body, "waybill") else {
        return bad_request("waybill is required");
    };
    let mut store = db.write().await;
    let Some(shipment) = store.shipments.get_mut(&waybill) else {
        return Json(json!({"status": false, "waybill": waybill, "error": "Waybill not found"}))
            .into_response();
    };

    if text(&body, "cancellation").as_deref() == Some("true") {
        if shipment.cancelled {
            return Json(json!({"status": false, "waybill": waybill, "error": "Shipment already cancelled"}))
                .into_response();
        }
        shipment.cancelled = true;
        return Json(json!({
            "status": true, "waybill": waybill, "order_id": shipment.order,
            "remark": "Shipment has been cancelled",
        }))
        .into_response();
    }

    if shipment.cancelled {
        return Json(json!({"status": false, "waybill": waybill, "error": "Cannot edit a cancelled shipment"}))
            .into_response();
    }
    for (key, value) in body {
        if key != "waybill" {
            shipment.fields.insert(key, value);
        }
    }
    Json(json!({
        "status": true, "waybill": waybill, "order_id": shipment.order,
        "remark": "Shipment details updated",
    }))
    .into_response()
}

// ---- pickups ----

#[derive(Deserialize)]
struct PickupBody {
    pickup_location: String,
    pickup_date: String,
    pickup_time: String,
    expected_package_count: u32,
}

async fn create_pickup(State(db): State<Db>, Json(body): Json<PickupBody>) -> Response {
    if body.expected_package_count == 0 {
        return bad_request("expected_package_count must be at least 1");
    }
    let mut store = db.write().await;
    if !store.warehouses.contains_key(&body.pickup_location) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"pr_exist": false, "error": {"message": "ClientWarehouse matching query does not exist."}})),
        )
            .into_response();
    }
    let pickup_id = store.next_pickup;
    store.next_pickup += 1;
    (
        StatusCode::CREATED,
        Json(json!({
            "pickup_id": pickup_id,
            "pickup_location_name": body.pickup_location,
            "client_name": "ACME",
            "pickup_date": body.pickup_date,
            "pickup_time": body.pickup_time,
            "incoming_center_name": "Bangalore_MGRoad_C",
            "expected_package_count": body.expected_package_count,
        })),
    )
        .into_response()
}

// ---- labels ----

async fn packing_slip(State(db): State<Db>, Query(params): Params) -> Response {
    let Some(wbns) = params.get("wbns") else {
        return bad_request("wbns is required");
    };
    let pdf = params.get("pdf").is_some_and(|v| v == "true");
    let size = params.get("pdf_size").map(String::as_str).unwrap_or("A4");
    let store = db.read().await;
    let packages: Vec<Value> = wbns
        .split(',')
        .filter_map(|wbn| store.shipments.get(wbn))
        .map(|s| {
            let mut package = json!({
                "wbn": s.waybill,
                "oid": s.order,
                "pin": text(&s.fields, "pin"),
                "name": text(&s.fields, "name"),
            });
            if pdf {
                package["pdf_download_link"] =
                    json!(format!("https://labels.mock.local/{size}/{}.pdf", s.waybill));
            }
            package
        })
        .collect();
    Json(json!({"packages_found": packages.len(), "packages": packages})).into_response()
}

// ---- tracking ----

async fn track(State(db): State<Db>, Query(params): Params) -> Response {
    let store = db.read().await;
    let mut waybills: Vec<&str> = params
        .get("waybill")
        .map(|w| w.split(',').filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    if let Some(refs) = params.get("ref_ids") {
        for reference in refs.split(',') {
            if let Some(waybill) = store.orders.get(reference) {
                if !waybills.contains(&waybill.as_str()) {
                    waybills.push(waybill.as_str());
                }
            }
        }
    }

    let data: Vec<Value> = waybills
        .iter()
        .filter_map(|wbn| store.shipments.get(*wbn))
        .map(|s| {
            let status = if s.cancelled { "Cancelled" } else { "Manifested" };
            json!({"Shipment": {
                "AWB": s.waybill,
                "ReferenceNo": s.order,
                "Origin": s.pickup_location,
                "Destination": text(&s.fields, "city"),
                "PickupLocation": s.pickup_location,
                "Status": {
                    "Status": status,
                    "StatusLocation": s.pickup_location,
                    "StatusDateTime": SCAN_TIME,
                    "StatusType": "UD",
                },
                "Scans": [{"ScanDetail": {
                    "ScanDateTime": SCAN_TIME,
                    "ScanType": "UD",
                    "Scan": "Manifested",
                    "ScannedLocation": s.pickup_location,
                    "Instructions": "Consignment Manifested",
                }}],
            }})
        })
        .collect();

    if data.is_empty() {
        return Json(json!({"ShipmentData": [], "Error": "No such waybill or Order Id found"}))
            .into_response();
    }
    Json(json!({"ShipmentData": data})).into_response()
}
