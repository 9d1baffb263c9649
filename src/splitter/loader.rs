//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理不同来源（内存字节 / Base64 / 本地文件）的原始字节加载，
//! 并在“尽可能早”的阶段执行输入校验。目标是尽快失败，
//! 减少不必要的内存与 CPU 消耗。
//!
//! ## 实现思路
//!
//! - 内存字节：体积限制 + 文件签名校验。
//! - Base64：格式解析 + 解码前体积估算 + 解码后体积限制。
//! - 文件：存在性 + metadata 体积限制 + 读取。
//! - 所有来源统一映射到 `RawImageData`，便于流水线后续处理。

use base64::{Engine as _, engine::general_purpose};
use std::path::Path;

use super::source::RawImageData;
use super::{SplitConfig, SplitError, SplitHandler};

impl SplitHandler {
    /// 从内存字节加载图片。
    pub(super) fn load_from_bytes(
        &self,
        bytes: Vec<u8>,
        config: &SplitConfig,
    ) -> Result<RawImageData, SplitError> {
        log::info!("📦 开始处理内存图片 - {} 字节", bytes.len());

        if bytes.len() as u64 > config.max_file_size {
            return Err(SplitError::ResourceLimit(format!(
                "输入体积过大：{:.2} MB（限制：{:.2} MB）",
                bytes.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "bytes",
        })
    }

    /// 从 Base64 字符串加载图片原始字节。
    pub(super) fn load_from_base64(
        &self,
        data: &str,
        config: &SplitConfig,
    ) -> Result<RawImageData, SplitError> {
        log::info!("📝 开始处理 base64 图片");

        let bytes = Self::parse_base64_with_limit(data, config.max_file_size)?;

        if bytes.len() as u64 > config.max_file_size {
            return Err(SplitError::ResourceLimit(format!(
                "Base64 解码后体积过大：{:.2} MB（限制：{:.2} MB）",
                bytes.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "base64",
        })
    }

    /// 从本地路径加载图片原始字节。
    pub(super) fn load_from_file(
        &self,
        path: &str,
        config: &SplitConfig,
    ) -> Result<RawImageData, SplitError> {
        log::info!("📁 开始读取本地图片 - 路径: {}", path);

        let file_path = Path::new(path);
        if !file_path.exists() {
            return Err(SplitError::FileSystem(format!("文件不存在：{}", path)));
        }

        let metadata = std::fs::metadata(file_path)
            .map_err(|e| SplitError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if metadata.len() > config.max_file_size {
            return Err(SplitError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = std::fs::read(file_path)
            .map_err(|e| SplitError::FileSystem(format!("无法读取图片文件：{}", e)))?;
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "file",
        })
    }

    /// 解析 Base64 输入，支持 `data:<mime>;base64,` 前缀。
    ///
    /// 解码前按 3/4 比例估算体积，提前拒绝超限输入。
    pub(super) fn parse_base64_with_limit(
        data: &str,
        max_file_size: u64,
    ) -> Result<Vec<u8>, SplitError> {
        let payload = if let Some(rest) = data.strip_prefix("data:") {
            let comma = rest.find(',').ok_or_else(|| {
                SplitError::InvalidFormat("Data URL 缺少逗号分隔符".to_string())
            })?;
            &rest[comma + 1..]
        } else {
            data
        };

        let trimmed = payload.trim();
        if trimmed.is_empty() {
            return Err(SplitError::InvalidFormat("Base64 内容为空".to_string()));
        }

        let estimated = trimmed.len() as u64 / 4 * 3;
        if estimated > max_file_size {
            return Err(SplitError::ResourceLimit(format!(
                "Base64 输入预计体积过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        general_purpose::STANDARD
            .decode(trimmed)
            .map_err(|e| SplitError::InvalidFormat(format!("Base64 解码失败：{}", e)))
    }

    /// 通过文件签名（magic bytes）校验输入是否为图片。
    fn validate_image_signature(bytes: &[u8]) -> Result<(), SplitError> {
        if bytes.is_empty() {
            return Err(SplitError::InvalidFormat("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| SplitError::InvalidFormat("无法识别图片类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(SplitError::InvalidFormat(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine as _, engine::general_purpose};
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::new_rgba8(8, 8);
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");
        cursor.into_inner()
    }

    #[test]
    fn load_from_bytes_accepts_png_signature() {
        let handler = SplitHandler::new(SplitConfig::default()).expect("handler init failed");
        let config = SplitConfig::default();

        let raw = handler
            .load_from_bytes(png_bytes(), &config)
            .expect("load should succeed");
        assert_eq!(raw.source_hint, "bytes");
    }

    #[test]
    fn load_from_bytes_rejects_non_image_signature() {
        let handler = SplitHandler::new(SplitConfig::default()).expect("handler init failed");
        let config = SplitConfig::default();

        let result = handler.load_from_bytes(b"definitely not an image".to_vec(), &config);
        assert!(matches!(result, Err(SplitError::InvalidFormat(_))));
    }

    #[test]
    fn load_from_bytes_rejects_oversized_input() {
        let handler = SplitHandler::new(SplitConfig::default()).expect("handler init failed");
        let mut config = SplitConfig::default();
        config.max_file_size = 16;

        let result = handler.load_from_bytes(png_bytes(), &config);
        assert!(matches!(result, Err(SplitError::ResourceLimit(_))));
    }

    #[test]
    fn parse_base64_strips_data_url_prefix() {
        let png = png_bytes();
        let encoded = general_purpose::STANDARD.encode(&png);
        let data_url = format!("data:image/png;base64,{}", encoded);

        let decoded = SplitHandler::parse_base64_with_limit(&data_url, 50 * 1024 * 1024)
            .expect("parse should succeed");
        assert_eq!(decoded, png);
    }

    #[test]
    fn parse_base64_rejects_empty_payload() {
        let result = SplitHandler::parse_base64_with_limit("data:image/png;base64,", 1024);
        assert!(matches!(result, Err(SplitError::InvalidFormat(_))));
    }

    #[test]
    fn parse_base64_rejects_estimated_oversize_before_decoding() {
        let oversized = "A".repeat(4096);
        let result = SplitHandler::parse_base64_with_limit(&oversized, 1024);
        assert!(matches!(result, Err(SplitError::ResourceLimit(_))));
    }

    #[test]
    fn load_from_file_reports_missing_path() {
        let handler = SplitHandler::new(SplitConfig::default()).expect("handler init failed");
        let config = SplitConfig::default();

        let result = handler.load_from_file("/definitely/not/here.png", &config);
        assert!(matches!(result, Err(SplitError::FileSystem(_))));
    }
}
