//! 小组批量导入
//!
//! 上传文件（.csv / .xlsx）的表头不区分大小写：
//! `advisor`（或 `orientador`）、`title`（或 `titulo`）、`rgm_1` .. `rgm_N`。
//! CSV 的分隔符在 `,` `;` TAB 中自动识别，UTF-8 BOM 会被去掉。

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use calamine::{Reader, Xlsx};
use futures_util::StreamExt;
use std::collections::HashMap;
use std::io::Cursor;
use tracing::{info, warn};

use super::GroupService;
use crate::config::AppConfig;
use crate::models::imports::entities::{ImportBatch, ImportRow, normalize_cell};
use crate::models::imports::requests::ImportQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// 分隔符识别只看文件开头这么多字节
const SNIFF_BYTES: usize = 8192;

/// 导入解析错误
#[derive(Debug)]
enum ImportParseError {
    MissingColumn(String),
    ParseFailed(String),
    EmptyFile,
}

impl ImportParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingColumn(_) => ErrorCode::ImportFileMissingColumn,
            Self::ParseFailed(_) => ErrorCode::ImportFileParseFailed,
            Self::EmptyFile => ErrorCode::ImportFileDataInvalid,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::MissingColumn(col) => format!("Missing required column: {col}"),
            Self::ParseFailed(msg) => msg.clone(),
            Self::EmptyFile => "The file has no header row".to_string(),
        }
    }
}

// 表头位置
#[derive(Debug)]
struct ColumnMap {
    advisor: Option<usize>,
    title: usize,
    rgms: Vec<usize>,
}

impl ColumnMap {
    fn from_headers<I>(headers: I, max_members: usize) -> Result<Self, ImportParseError>
    where
        I: IntoIterator<Item = String>,
    {
        let index: HashMap<String, usize> = headers
            .into_iter()
            .enumerate()
            .map(|(i, h)| (normalize_cell(&h).to_lowercase(), i))
            .collect();
        let find = |names: &[&str]| names.iter().find_map(|n| index.get(*n).copied());

        let title = find(&["title", "titulo"])
            .ok_or_else(|| ImportParseError::MissingColumn("title".to_string()))?;
        let advisor = find(&["advisor", "orientador"]);
        let rgms: Vec<usize> = (1..=max_members)
            .filter_map(|n| index.get(&format!("rgm_{n}")).copied())
            .collect();
        if rgms.is_empty() {
            return Err(ImportParseError::MissingColumn("rgm_1".to_string()));
        }

        Ok(Self {
            advisor,
            title,
            rgms,
        })
    }

    /// 整行为空时返回 None
    fn row(&self, line: usize, cell: impl Fn(usize) -> String) -> Option<ImportRow> {
        let advisor = self.advisor.map(&cell).unwrap_or_default();
        let title = cell(self.title);
        let rgms: Vec<String> = self
            .rgms
            .iter()
            .map(|&i| cell(i).to_uppercase())
            .collect();

        if advisor.is_empty() && title.is_empty() && rgms.iter().all(String::is_empty) {
            return None;
        }
        Some(ImportRow {
            line,
            advisor,
            title,
            rgms,
        })
    }
}

/// 去掉 BOM；不是合法 UTF-8 时按 Latin-1 解码
fn decode_text(data: &[u8]) -> String {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => data.iter().map(|&b| b as char).collect(),
    }
}

/// 出现次数最多的分隔符；都没有时用逗号
fn detect_delimiter(text: &str) -> u8 {
    let sample: String = text.chars().take(SNIFF_BYTES).collect();
    let mut best = (b',', 0);
    for delimiter in [b',', b';', b'\t'] {
        let count = sample.bytes().filter(|&b| b == delimiter).count();
        if count > best.1 {
            best = (delimiter, count);
        }
    }
    best.0
}

fn parse_csv(data: &[u8], max_members: usize) -> Result<Vec<ImportRow>, ImportParseError> {
    let text = decode_text(data);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(detect_delimiter(&text))
        .from_reader(Cursor::new(text.as_bytes()));

    let headers = rdr
        .headers()
        .map_err(|e| ImportParseError::ParseFailed(format!("Failed to read header: {e}")))?
        .clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ImportParseError::EmptyFile);
    }
    let columns = ColumnMap::from_headers(headers.iter().map(str::to_string), max_members)?;

    let mut rows = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let line = index + 2;
        let record = result.map_err(|e| {
            ImportParseError::ParseFailed(format!("Failed to parse line {line}: {e}"))
        })?;
        let cell = |i: usize| record.get(i).map(normalize_cell).unwrap_or_default();
        if let Some(row) = columns.row(line, cell) {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn parse_xlsx(data: &[u8], max_members: usize) -> Result<Vec<ImportRow>, ImportParseError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))
        .map_err(|e| ImportParseError::ParseFailed(format!("Failed to open XLSX: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportParseError::ParseFailed("The workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportParseError::ParseFailed(format!("Failed to read sheet: {e}")))?;

    let mut sheet_rows = range.rows();
    let header = sheet_rows.next().ok_or(ImportParseError::EmptyFile)?;
    let columns = ColumnMap::from_headers(header.iter().map(|c| c.to_string()), max_members)?;

    let mut rows = Vec::new();
    for (index, sheet_row) in sheet_rows.enumerate() {
        let cell = |i: usize| {
            sheet_row
                .get(i)
                .map(|c| normalize_cell(&c.to_string()))
                .unwrap_or_default()
        };
        if let Some(row) = columns.row(index + 2, cell) {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn parse_upload(
    file_name: &str,
    data: &[u8],
    max_members: usize,
) -> Result<Vec<ImportRow>, ImportParseError> {
    if file_name.to_lowercase().ends_with(".xlsx") {
        parse_xlsx(data, max_members)
    } else {
        parse_csv(data, max_members)
    }
}

fn is_supported_file(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower.ends_with(".csv") || lower.ends_with(".xlsx")
}

async fn read_file_from_multipart(payload: &mut Multipart) -> Result<(Vec<u8>, String), String> {
    let mut file_bytes = Vec::new();
    let mut file_name = String::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| format!("Failed to read field: {e}"))?;

        if field.name() == Some("file") {
            file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .unwrap_or("upload.csv")
                .to_string();

            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| format!("Failed to read data: {e}"))?;
                file_bytes.extend_from_slice(&data);
            }
        }
    }

    if file_bytes.is_empty() {
        return Err("No file field found".to_string());
    }

    Ok((file_bytes, file_name))
}

pub async fn import_groups(
    service: &GroupService,
    query: ImportQuery,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let limits = &AppConfig::get().import;

    let (file_bytes, file_name) = match read_file_from_multipart(&mut payload).await {
        Ok(result) => result,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::FileUploadFailed,
                format!("File upload failed: {e}"),
            )));
        }
    };

    if !is_supported_file(&file_name) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileUploadFailed,
            "Only .csv and .xlsx files are supported",
        )));
    }

    let rows = match parse_upload(&file_name, &file_bytes, limits.max_members_per_row) {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Import file {} rejected: {}", file_name, e.message());
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(e.error_code(), e.message())));
        }
    };

    if rows.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ImportFileDataInvalid,
            "The file has no data rows",
        )));
    }
    if rows.len() > limits.max_rows {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ImportFileDataInvalid,
            format!("At most {} rows can be imported at once", limits.max_rows),
        )));
    }

    let batch = ImportBatch::from_rows(&rows);
    info!(
        "Importing {} rows ({} groups) from {}, dry_run={}",
        rows.len(),
        batch.groups.len(),
        file_name,
        query.dry_run
    );

    match storage.import_groups(&batch, query).await {
        Ok(summary) => {
            let message = if summary.dry_run {
                "Import dry run completed"
            } else {
                "Import completed"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(summary, message)))
        }
        Err(e) => Ok(error_response(request, &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), b';');
        assert_eq!(detect_delimiter("a\tb\n1\t2"), b'\t');
        assert_eq!(detect_delimiter("a,b\n1,2"), b',');
        assert_eq!(detect_delimiter("single"), b',');
    }

    #[test]
    fn test_csv_with_bom_and_semicolons() {
        let data = "\u{feff}Orientador;TITULO;RGM_1;rgm_2\nAna Souza; Robot  arm ;0001;ab2\n";
        let rows = parse_csv(data.as_bytes(), 3).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].advisor, "Ana Souza");
        assert_eq!(rows[0].title, "Robot arm");
        assert_eq!(rows[0].rgms, vec!["0001".to_string(), "AB2".to_string()]);
    }

    #[test]
    fn test_rgm_columns_beyond_limit_are_ignored() {
        let data = "advisor,title,rgm_1,rgm_2,rgm_3\nA,T,1,2,3\n";
        let rows = parse_csv(data.as_bytes(), 2).unwrap();
        assert_eq!(rows[0].rgms, vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_missing_title_column() {
        let err = parse_csv(b"advisor,rgm_1\nA,1\n", 3).unwrap_err();
        assert!(matches!(err, ImportParseError::MissingColumn(ref c) if c == "title"));
        assert_eq!(err.error_code(), ErrorCode::ImportFileMissingColumn);
    }

    #[test]
    fn test_missing_rgm_columns() {
        let err = parse_csv(b"advisor,title\nA,T\n", 3).unwrap_err();
        assert!(matches!(err, ImportParseError::MissingColumn(ref c) if c == "rgm_1"));
    }

    #[test]
    fn test_blank_rows_dropped_and_untitled_rows_kept() {
        let data = "title,rgm_1\n,,\nT,1\n,2\n";
        let rows = parse_csv(data.as_bytes(), 3).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].title, "");
        assert_eq!(rows[1].line, 4);

        let batch = ImportBatch::from_rows(&rows);
        assert_eq!(batch.skipped_lines, vec![4]);
    }

    #[test]
    fn test_latin1_fallback() {
        let mut data = b"title,rgm_1\nJo".to_vec();
        data.push(0xE3);
        data.extend_from_slice(b"o,1\n");
        let rows = parse_csv(&data, 3).unwrap();
        assert_eq!(rows[0].title, "Jo\u{e3}o");
    }

    #[test]
    fn test_supported_files() {
        assert!(is_supported_file("grupos.CSV"));
        assert!(is_supported_file("grupos.xlsx"));
        assert!(!is_supported_file("grupos.xls"));
    }

    #[test]
    fn test_invalid_xlsx_is_parse_error() {
        let err = parse_xlsx(b"not a zip", 3).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::ImportFileParseFailed);
    }
}
