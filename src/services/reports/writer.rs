use actix_web::HttpResponse;
use rust_xlsxwriter::{Format, Workbook};

use crate::errors::TgiSystemError;
use crate::models::reports::entities::ReportFormat;

// 列宽上限
const MAX_COLUMN_WIDTH: usize = 60;

/// 表格内容：表头加若干行，全部为字符串
pub struct Table {
    pub sheet_name: &'static str,
    pub header: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl Table {
    pub fn render(&self, format: ReportFormat) -> Result<Vec<u8>, TgiSystemError> {
        match format {
            ReportFormat::Csv => self.to_csv(),
            ReportFormat::Xlsx => self.to_xlsx(),
        }
    }

    fn to_csv(&self) -> Result<Vec<u8>, TgiSystemError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(&self.header)
            .map_err(|e| TgiSystemError::export(format!("写入 CSV 表头失败: {e}")))?;
        for record in &self.records {
            writer
                .write_record(record)
                .map_err(|e| TgiSystemError::export(format!("写入 CSV 行失败: {e}")))?;
        }
        writer
            .into_inner()
            .map_err(|e| TgiSystemError::export(format!("生成 CSV 失败: {e}")))
    }

    fn to_xlsx(&self) -> Result<Vec<u8>, TgiSystemError> {
        let xlsx_err = |e: rust_xlsxwriter::XlsxError| TgiSystemError::export(e.to_string());

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let sheet = workbook
            .add_worksheet()
            .set_name(self.sheet_name)
            .map_err(xlsx_err)?;

        for (col, title) in self.header.iter().enumerate() {
            sheet
                .write_string_with_format(0, col as u16, title, &header_format)
                .map_err(xlsx_err)?;
        }
        for (row, record) in self.records.iter().enumerate() {
            for (col, value) in record.iter().enumerate() {
                sheet
                    .write_string(row as u32 + 1, col as u16, value)
                    .map_err(xlsx_err)?;
            }
        }

        for (col, width) in self.column_widths().into_iter().enumerate() {
            sheet.set_column_width(col as u16, width as f64).ok();
        }

        workbook.save_to_buffer().map_err(xlsx_err)
    }

    fn column_widths(&self) -> Vec<usize> {
        self.header
            .iter()
            .enumerate()
            .map(|(col, title)| {
                self.records
                    .iter()
                    .filter_map(|r| r.get(col))
                    .map(|v| v.chars().count())
                    .chain(std::iter::once(title.chars().count()))
                    .max()
                    .unwrap_or(0)
                    .clamp(8, MAX_COLUMN_WIDTH)
                    + 2
            })
            .collect()
    }
}

/// 以附件形式返回文件
pub fn attachment(format: ReportFormat, file_name: &str, body: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(format.content_type())
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{file_name}\""),
        ))
        .body(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table {
            sheet_name: "Grades",
            header: vec!["rgm".to_string(), "name".to_string()],
            records: vec![
                vec!["0001".to_string(), "Silva, Ana".to_string()],
                vec!["0002".to_string(), "Bruno".to_string()],
            ],
        }
    }

    #[test]
    fn test_csv_output_quotes_commas() {
        let bytes = table().render(ReportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "rgm,name\n0001,\"Silva, Ana\"\n0002,Bruno\n");
    }

    #[test]
    fn test_xlsx_output_is_zip() {
        let bytes = table().render(ReportFormat::Xlsx).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let empty = Table {
            records: Vec::new(),
            ..table()
        };
        let text = String::from_utf8(empty.render(ReportFormat::Csv).unwrap()).unwrap();
        assert_eq!(text, "rgm,name\n");
    }

    #[test]
    fn test_column_widths_bounded() {
        let wide = Table {
            sheet_name: "Groups",
            header: vec!["id".to_string()],
            records: vec![vec!["x".repeat(200)]],
        };
        assert_eq!(wide.column_widths(), vec![MAX_COLUMN_WIDTH + 2]);
        assert_eq!(table().column_widths(), vec![10, 12]);
    }

    #[test]
    fn test_attachment_headers() {
        let resp = attachment(ReportFormat::Csv, "grades_20250901_153000.csv", b"a".to_vec());
        let disposition = resp
            .headers()
            .get("Content-Disposition")
            .unwrap()
            .to_str()
            .unwrap();
        assert_eq!(disposition, "attachment; filename=\"grades_20250901_153000.csv\"");
    }
}
