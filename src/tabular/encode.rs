//! Row encoding: export rows out to xlsx, csv or tab-separated text.

use rust_xlsxwriter::Workbook;
use thiserror::Error;

use super::{CellScalar, ExportFormat, TEMPLATE_COLUMNS};
use crate::record_store::ExpandedProduct;

/// Errors produced while encoding export output.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Failed to build workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to write delimited text: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush delimited text: {0}")]
    Io(#[from] std::io::Error),
}

/// The flat, template-shaped rendering of one persisted product: the inverse
/// mapping of normalization, with reference ids already expanded to names.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub name: String,
    pub tags: String,
    pub category: String,
    pub brand: String,
    pub special_appearance: String,
    pub short_description: String,
    pub stock_quantity: i64,
    pub price: f64,
    pub discounted_price: f64,
    pub number_of_pieces: String,
    pub sound_level: String,
    pub light_effect: String,
    pub safety_rating: String,
    pub usage_area: String,
    pub duration: String,
    pub weight_per_box: String,
    pub product_hero_image: String,
    pub product_gallery: String,
    pub status: bool,
}

impl ExportRow {
    /// Map a store product back into the upload-template shape. List fields
    /// are joined with `", "`; absent numerics render as 0.
    pub fn from_expanded(expanded: &ExpandedProduct) -> Self {
        let record = &expanded.product.record;
        Self {
            name: record.name.clone(),
            tags: record.tags.join(", "),
            category: expanded.category_names.join(", "),
            brand: expanded.brand_name.clone().unwrap_or_default(),
            special_appearance: record.special_appearance.join(", "),
            short_description: record.short_description.clone(),
            stock_quantity: record.stock_quantity,
            price: record.price,
            discounted_price: record.discounted_price,
            number_of_pieces: record.number_of_pieces.clone(),
            sound_level: record.sound_level.clone(),
            light_effect: record.light_effect.clone(),
            safety_rating: record.safety_rating.clone(),
            usage_area: record.usage_area.clone(),
            duration: record.duration.clone(),
            weight_per_box: record.weight_per_box.clone(),
            product_hero_image: record.product_hero_image.clone(),
            product_gallery: record.product_gallery.join(", "),
            status: record.status,
        }
    }

    /// Cell values in template column order. `status` renders as the literal
    /// strings `"True"`/`"False"` in every format.
    fn cells(&self) -> [CellScalar; 19] {
        [
            CellScalar::Text(self.name.clone()),
            CellScalar::Text(self.tags.clone()),
            CellScalar::Text(self.category.clone()),
            CellScalar::Text(self.brand.clone()),
            CellScalar::Text(self.special_appearance.clone()),
            CellScalar::Text(self.short_description.clone()),
            CellScalar::Number(self.stock_quantity as f64),
            CellScalar::Number(self.price),
            CellScalar::Number(self.discounted_price),
            CellScalar::Text(self.number_of_pieces.clone()),
            CellScalar::Text(self.sound_level.clone()),
            CellScalar::Text(self.light_effect.clone()),
            CellScalar::Text(self.safety_rating.clone()),
            CellScalar::Text(self.usage_area.clone()),
            CellScalar::Text(self.duration.clone()),
            CellScalar::Text(self.weight_per_box.clone()),
            CellScalar::Text(self.product_hero_image.clone()),
            CellScalar::Text(self.product_gallery.clone()),
            CellScalar::Text(if self.status { "True" } else { "False" }.to_string()),
        ]
    }
}

/// Encode export rows into the requested format, headers included.
pub fn encode_rows(rows: &[ExportRow], format: ExportFormat) -> Result<Vec<u8>, EncodeError> {
    match format {
        ExportFormat::Excel => encode_xlsx(rows, "Products"),
        ExportFormat::Csv => encode_delimited(rows, b','),
        ExportFormat::Txt => encode_delimited(rows, b'\t'),
    }
}

/// Encode a headers-only template with zero data rows.
pub fn encode_template(format: ExportFormat) -> Result<Vec<u8>, EncodeError> {
    match format {
        ExportFormat::Excel => encode_xlsx(&[], "Sample"),
        ExportFormat::Csv => encode_delimited(&[], b','),
        ExportFormat::Txt => encode_delimited(&[], b'\t'),
    }
}

fn encode_xlsx(rows: &[ExportRow], sheet_name: &str) -> Result<Vec<u8>, EncodeError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, header) in TEMPLATE_COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let r = (idx + 1) as u32;
        for (col, cell) in row.cells().iter().enumerate() {
            let c = col as u16;
            match cell {
                CellScalar::Number(n) => {
                    worksheet.write_number(r, c, *n)?;
                }
                other => {
                    worksheet.write_string(r, c, other.display())?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn encode_delimited(rows: &[ExportRow], delimiter: u8) -> Result<Vec<u8>, EncodeError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(TEMPLATE_COLUMNS)?;
    for row in rows {
        writer.write_record(row.cells().iter().map(|c| c.display()))?;
    }

    writer
        .into_inner()
        .map_err(|e| EncodeError::Io(e.into_error()))
}
