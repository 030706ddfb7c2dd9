//! Shipping labels (packing slips).

use serde::{Deserialize, Serialize};

use super::validation::ValidationError;
use super::waybill::{self, Waybill};

const MAX_WAYBILLS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageSize {
    A4,
    #[serde(rename = "4R")]
    FourR,
}

impl PageSize {
    pub fn code(&self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::FourR => "4R",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRequest {
    waybills: Vec<Waybill>,
    pdf: bool,
    page_size: Option<PageSize>,
}

impl LabelRequest {
    /// JSON slip data for the given waybills. Use `pdf` for a rendered label.
    pub fn new(waybills: Vec<Waybill>) -> Result<Self, ValidationError> {
        if waybills.is_empty() || waybills.len() > MAX_WAYBILLS {
            return Err(ValidationError::Count {
                field: "wbns",
                min: 1,
                max: MAX_WAYBILLS,
                actual: waybills.len(),
            });
        }
        Ok(Self {
            waybills,
            pdf: false,
            page_size: None,
        })
    }

    /// Ask for a hosted PDF instead of slip data.
    pub fn pdf(mut self, page_size: Option<PageSize>) -> Self {
        self.pdf = true;
        self.page_size = page_size;
        self
    }

    pub fn waybills(&self) -> &[Waybill] {
        &self.waybills
    }

    pub fn wants_pdf(&self) -> bool {
        self.pdf
    }

    pub fn page_size(&self) -> Option<PageSize> {
        self.page_size
    }

    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("wbns".to_string(), waybill::join(&self.waybills)),
            ("pdf".to_string(), self.pdf.to_string()),
        ];
        if let Some(size) = self.page_size {
            pairs.push(("pdf_size".to_string(), size.code().to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelResult {
    #[serde(default)]
    pub packages: Vec<LabelPackage>,
    #[serde(default)]
    pub packages_found: u32,
}

impl LabelResult {
    pub fn waybills(&self) -> Vec<&str> {
        self.packages.iter().map(|p| p.waybill.as_str()).collect()
    }

    pub fn pdf_links(&self) -> Vec<&str> {
        self.packages
            .iter()
            .filter_map(|p| p.pdf_download_link.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPackage {
    #[serde(rename = "wbn")]
    pub waybill: String,
    /// Hosted PDF, present when a PDF was requested.
    #[serde(default)]
    pub pdf_download_link: Option<String>,
}
