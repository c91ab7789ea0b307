// ==========================================
// 汽修车间预约排产系统 - 请求文件解析器
// ==========================================
// 格式: 制表符分隔, 每行一个操作
//   C <客户名>                       新增客户
//   V <客户名> <车辆描述>            新增车辆
//   S <客户名> <车辆描述> <服务名>   请求预约
// 说明: 动作码未知或字段不足的行记录告警后跳过, 不中断整批解析
// ==========================================

use crate::importer::error::ImportError;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ==========================================
// RequestOp - 请求操作
// ==========================================
// 每个操作 1:1 对应一次会话调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOp {
    AddCustomer {
        customer_name: String,
    },
    AddVehicle {
        customer_name: String,
        vehicle_description: String,
    },
    RequestAppointment {
        customer_name: String,
        vehicle_description: String,
        service_name: String,
    },
}

// ==========================================
// RequestFileParser - 请求文件解析器
// ==========================================
pub struct RequestFileParser;

impl RequestFileParser {
    /// 解析请求文件
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<RequestOp>, ImportError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        Self::parse_reader(File::open(path)?)
    }

    /// 从任意读取器解析 (测试与管道输入复用)
    pub fn parse_reader<R: Read>(reader: R) -> Result<Vec<RequestOp>, ImportError> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true) // 允许行字段数不一致
            .from_reader(reader);

        let mut ops = Vec::new();
        for (idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let line_no = idx + 1;

            let fields: Vec<&str> = record.iter().map(|f| f.trim()).collect();
            // 跳过完全空白的行
            if fields.iter().all(|f| f.is_empty()) {
                continue;
            }

            match Self::parse_fields(&fields) {
                Some(op) => ops.push(op),
                None => {
                    warn!(line_no, line = %fields.join("\t"), "无法解析的请求行, 已跳过");
                }
            }
        }

        Ok(ops)
    }

    /// 单行字段 => 操作; 动作码未知或字段不足返回 None
    fn parse_fields(fields: &[&str]) -> Option<RequestOp> {
        match *fields.first()? {
            "C" => Some(RequestOp::AddCustomer {
                customer_name: fields.get(1)?.to_string(),
            }),
            "V" => Some(RequestOp::AddVehicle {
                customer_name: fields.get(1)?.to_string(),
                vehicle_description: fields.get(2)?.to_string(),
            }),
            "S" => Some(RequestOp::RequestAppointment {
                customer_name: fields.get(1)?.to_string(),
                vehicle_description: fields.get(2)?.to_string(),
                service_name: fields.get(3)?.to_string(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_three_forms() {
        let input = "C\tAlice\nV\tAlice\tRed Truck\nS\tAlice\tRed Truck\tOil Change\n";
        let ops = RequestFileParser::parse_reader(input.as_bytes()).expect("Failed to parse");

        assert_eq!(
            ops,
            vec![
                RequestOp::AddCustomer {
                    customer_name: "Alice".to_string()
                },
                RequestOp::AddVehicle {
                    customer_name: "Alice".to_string(),
                    vehicle_description: "Red Truck".to_string()
                },
                RequestOp::RequestAppointment {
                    customer_name: "Alice".to_string(),
                    vehicle_description: "Red Truck".to_string(),
                    service_name: "Oil Change".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_unknown_action_is_skipped() {
        let input = "C\tAlice\nX\tsomething\nC\tBob\n";
        let ops = RequestFileParser::parse_reader(input.as_bytes()).expect("Failed to parse");
        assert_eq!(ops.len(), 2);
    }

    #[test]
    fn test_short_line_is_skipped() {
        // V 行缺少车辆描述
        let input = "V\tAlice\nS\tAlice\tRed Truck\tOil Change\n";
        let ops = RequestFileParser::parse_reader(input.as_bytes()).expect("Failed to parse");
        assert_eq!(ops.len(), 1);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let input = "C\tAlice\n\n\nC\tBob\n";
        let ops = RequestFileParser::parse_reader(input.as_bytes()).expect("Failed to parse");
        assert_eq!(ops.len(), 2);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let result = RequestFileParser::parse_file("no_such_requests.txt");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_parse_file_from_disk() {
        use std::io::Write;
        let mut temp_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "C\tAlice").expect("Failed to write");
        writeln!(temp_file, "V\tAlice\tRed Truck").expect("Failed to write");

        let ops = RequestFileParser::parse_file(temp_file.path()).expect("Failed to parse");
        assert_eq!(ops.len(), 2);
    }
}
