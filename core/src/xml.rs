//! XML decoding for the invoice charges endpoint.
//!
//! The provider renders the quote as a `<list-item>` whose fields may come
//! either as attributes or as child elements, depending on the serializer in
//! front of it. Both encodings are accepted. Numbers must parse as
//! non-negative decimals; anything else is a decode error, never a silent
//! zero.

use std::collections::BTreeMap;
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::schema::{ChargeBreakdown, TaxBreakdown};

const LIST_ITEM: &str = "list-item";
const TAX_DATA: &str = "tax_data";
const CHARGE_PREFIX: &str = "charge_";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlDecodeError {
    #[error("invalid XML: {0}")]
    Syntax(String),

    #[error("document has no <{LIST_ITEM}> element")]
    MissingListItem,

    #[error("{field} is required")]
    MissingField { field: String },

    #[error("{field} is not a decimal number: {value:?}")]
    NotANumber { field: String, value: String },

    #[error("{field} must not be negative: {value}")]
    Negative { field: String, value: Decimal },
}

/// Decode an invoice charges document.
pub fn parse_charge_breakdown(xml: &str) -> Result<ChargeBreakdown, XmlDecodeError> {
    let root = parse_tree(xml)?;
    let item = root.find(LIST_ITEM).ok_or(XmlDecodeError::MissingListItem)?;

    let mut charges = BTreeMap::new();
    for (name, value) in item.fields() {
        if let Some(code) = name.strip_prefix(CHARGE_PREFIX) {
            if let Some(amount) = decimal(name, value)? {
                charges.insert(code.to_string(), amount);
            }
        }
    }

    let tax = match item.child(TAX_DATA) {
        Some(tax) => TaxBreakdown {
            igst: tax_component(tax, "IGST")?,
            cgst: tax_component(tax, "CGST")?,
            sgst: tax_component(tax, "SGST")?,
            service_tax: tax_component(tax, "service_tax")?,
            swachh_bharat_tax: tax_component(tax, "swacch_bharat_tax")?,
            krishi_kalyan_cess: tax_component(tax, "krishi_kalyan_cess")?,
        },
        None => TaxBreakdown::default(),
    };

    let total_amount = match item.field("total_amount") {
        Some(value) => decimal("total_amount", value)?,
        None => None,
    }
    .ok_or_else(|| XmlDecodeError::MissingField {
        field: "total_amount".to_string(),
    })?;

    Ok(ChargeBreakdown {
        total_amount,
        gross_amount: optional_decimal(item, "gross_amount")?,
        charged_weight: optional_decimal(item, "charged_weight")?,
        zone: item.text_field("zone"),
        status: item.text_field("status"),
        charges,
        tax,
    })
}

fn tax_component(tax: &Element, name: &str) -> Result<Decimal, XmlDecodeError> {
    Ok(optional_decimal(tax, name)?.unwrap_or_default())
}

fn optional_decimal(element: &Element, name: &str) -> Result<Option<Decimal>, XmlDecodeError> {
    match element.field(name) {
        Some(value) => decimal(name, value),
        None => Ok(None),
    }
}

/// Blank text means the field is absent.
fn decimal(field: &str, raw: &str) -> Result<Option<Decimal>, XmlDecodeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| XmlDecodeError::NotANumber {
            field: field.to_string(),
            value: raw.to_string(),
        })?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(XmlDecodeError::Negative {
            field: field.to_string(),
            value,
        });
    }
    Ok(Some(value))
}

/// Minimal element tree; enough for the flat documents this endpoint returns.
#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlDecodeError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| XmlDecodeError::Syntax(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| XmlDecodeError::Syntax(e.to_string()))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }

    /// This element or its first descendant with the given name.
    fn find(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// A field value: the attribute if present, otherwise the text of a
    /// leaf child element.
    fn field(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .or_else(|| {
                self.child(name)
                    .filter(|child| child.children.is_empty())
                    .map(|child| child.text.as_str())
            })
    }

    fn text_field(&self, name: &str) -> Option<String> {
        self.field(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Every scalar field, attributes first, then leaf children.
    fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        let attributes = self
            .attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()));
        let leaves = self
            .children
            .iter()
            .filter(|child| child.children.is_empty())
            .filter(|child| !self.attributes.iter().any(|(key, _)| *key == child.name))
            .map(|child| (child.name.as_str(), child.text.as_str()));
        attributes.chain(leaves)
    }
}

fn parse_tree(xml: &str) -> Result<Element, XmlDecodeError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => stack.push(Element::from_start(&start)?),
            Ok(Event::Empty(start)) => {
                let element = Element::from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlDecodeError::Syntax("unbalanced end tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(text)) => {
                let text = text
                    .unescape()
                    .map_err(|e| XmlDecodeError::Syntax(e.to_string()))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(XmlDecodeError::Syntax(err.to_string())),
        }
    }

    if !stack.is_empty() {
        return Err(XmlDecodeError::Syntax("unexpected end of document".to_string()));
    }
    root.ok_or_else(|| XmlDecodeError::Syntax("empty document".to_string()))
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlDecodeError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(XmlDecodeError::Syntax(
                "more than one root element".to_string(),
            ))
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const ELEMENTS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<root>
  <list-item>
    <charge_DL>75.0</charge_DL>
    <charge_FSC>10.5</charge_FSC>
    <charge_COD>0</charge_COD>
    <charge_AIR></charge_AIR>
    <gross_amount>85.5</gross_amount>
    <total_amount>100.89</total_amount>
    <charged_weight>1500</charged_weight>
    <zone>D</zone>
    <status>Delivered</status>
    <tax_data>
      <IGST>15.39</IGST>
      <CGST>0</CGST>
      <SGST>0</SGST>
      <swacch_bharat_tax>0</swacch_bharat_tax>
    </tax_data>
  </list-item>
</root>"#;

    const ATTRIBUTES: &str = r#"<root><list-item charge_DL="75.0" charge_FSC="10.5"
        charge_COD="0" charge_AIR="" gross_amount="85.5" total_amount="100.89"
        charged_weight="1500" zone="D" status="Delivered"><tax_data IGST="15.39" CGST="0"
        SGST="0" swacch_bharat_tax="0"/></list-item></root>"#;

    #[test]
    fn decodes_element_encoding() {
        let breakdown = parse_charge_breakdown(ELEMENTS).unwrap();
        assert_eq!(breakdown.total_amount, Decimal::new(10089, 2));
        assert_eq!(breakdown.gross_amount, Some(Decimal::new(855, 1)));
        assert_eq!(breakdown.base_freight(), Some(Decimal::new(750, 1)));
        assert_eq!(breakdown.fuel_surcharge(), Some(Decimal::new(105, 1)));
        assert_eq!(breakdown.cod_charge(), Some(Decimal::ZERO));
        assert_eq!(breakdown.charge("AIR"), None);
        assert_eq!(breakdown.zone.as_deref(), Some("D"));
        assert_eq!(breakdown.tax.igst, Decimal::new(1539, 2));
        assert_eq!(breakdown.tax.krishi_kalyan_cess, Decimal::ZERO);
    }

    #[test]
    fn attribute_and_element_encodings_agree() {
        assert_eq!(
            parse_charge_breakdown(ATTRIBUTES).unwrap(),
            parse_charge_breakdown(ELEMENTS).unwrap()
        );
    }

    #[test]
    fn list_item_may_be_the_root() {
        let breakdown =
            parse_charge_breakdown(r#"<list-item><total_amount>42</total_amount></list-item>"#)
                .unwrap();
        assert_eq!(breakdown.total_amount, Decimal::from(42));
        assert!(breakdown.charges.is_empty());
        assert_eq!(breakdown.tax, TaxBreakdown::default());
    }

    #[test]
    fn non_numeric_amount_is_an_error_not_zero() {
        let err = parse_charge_breakdown(
            r#"<root><list-item><total_amount>10</total_amount><charge_DL>n/a</charge_DL></list-item></root>"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            XmlDecodeError::NotANumber {
                field: "charge_DL".to_string(),
                value: "n/a".to_string()
            }
        );
    }

    #[test]
    fn negative_amount_is_rejected() {
        let err = parse_charge_breakdown(r#"<list-item total_amount="-5"/>"#).unwrap_err();
        assert!(matches!(err, XmlDecodeError::Negative { .. }));
    }

    #[test]
    fn missing_total_is_rejected() {
        let err = parse_charge_breakdown(r#"<root><list-item><charge_DL>1</charge_DL></list-item></root>"#)
            .unwrap_err();
        assert_eq!(
            err,
            XmlDecodeError::MissingField {
                field: "total_amount".to_string()
            }
        );
    }

    #[test]
    fn missing_list_item_and_broken_documents_are_rejected() {
        assert_eq!(
            parse_charge_breakdown("<root><item/></root>").unwrap_err(),
            XmlDecodeError::MissingListItem
        );
        assert!(matches!(
            parse_charge_breakdown("<root><list-item>").unwrap_err(),
            XmlDecodeError::Syntax(_)
        ));
        assert!(matches!(
            parse_charge_breakdown(r#"{"total_amount": 10}"#).unwrap_err(),
            XmlDecodeError::Syntax(_)
        ));
    }

    #[test]
    fn scientific_notation_is_accepted() {
        let breakdown = parse_charge_breakdown(r#"<list-item total_amount="1.5e2"/>"#).unwrap();
        assert_eq!(breakdown.total_amount, Decimal::from(150));
    }

    fn amount() -> impl Strategy<Value = String> {
        (0u32..1_000_000, 0u32..100).prop_map(|(whole, cents)| format!("{whole}.{cents:02}"))
    }

    proptest! {
        #[test]
        fn encodings_are_interchangeable(
            total in amount(),
            freight in amount(),
            fuel in amount(),
            igst in amount(),
        ) {
            let as_elements = format!(
                "<root><list-item><total_amount>{total}</total_amount><charge_DL>{freight}</charge_DL>\
                 <charge_FSC>{fuel}</charge_FSC><tax_data><IGST>{igst}</IGST></tax_data></list-item></root>"
            );
            let as_attributes = format!(
                r#"<root><list-item total_amount="{total}" charge_DL="{freight}" charge_FSC="{fuel}"><tax_data IGST="{igst}"/></list-item></root>"#
            );
            let a = parse_charge_breakdown(&as_elements).unwrap();
            let b = parse_charge_breakdown(&as_attributes).unwrap();
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.total_amount, Decimal::from_str(&total).unwrap());
        }
    }
}
