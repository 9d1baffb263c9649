//! # 解码流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → 图像”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先做尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 猜测格式（保持输入编码策略需要格式信息）
//! 2. 读取 header 尺寸并按像素上限快速拒绝
//! 3. 完整解码
//! 4. 按真实尺寸复查上限
//! 5. 校验最小可拆分尺寸（2x2）

use image::{GenericImageView, ImageFormat, ImageReader};
use std::io::Cursor;

use super::source::{DecodedImage, RawImageData};
use super::{SplitConfig, SplitError, SplitHandler};

/// 象限拆分要求的最小宽高。
const MIN_SPLIT_DIMENSION: u32 = 2;

impl SplitHandler {
    /// 将原始字节解码为可拆分的图像。
    pub(crate) fn decode_source(
        &self,
        raw: RawImageData,
        config: &SplitConfig,
    ) -> Result<DecodedImage, SplitError> {
        let format: ImageFormat = image::guess_format(&raw.bytes)
            .map_err(|e| SplitError::InvalidFormat(format!("不支持的图片格式：{}", e)))?;

        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        self.validate_pixel_limits(config, header_width, header_height)?;
        self.validate_decoded_memory_limits(config, header_width, header_height)?;

        let decoded = image::load_from_memory(&raw.bytes)
            .map_err(|e| SplitError::Decode(format!("图片解码失败：{}", e)))?;

        let (width, height) = decoded.dimensions();
        self.validate_pixel_limits(config, width, height)?;
        self.validate_decoded_memory_limits(config, width, height)?;

        if width < MIN_SPLIT_DIMENSION || height < MIN_SPLIT_DIMENSION {
            return Err(SplitError::Decode(format!(
                "图片过小无法四等分：{}x{}（最小 {}x{}）",
                width, height, MIN_SPLIT_DIMENSION, MIN_SPLIT_DIMENSION
            )));
        }

        log::info!(
            "✅ 图片解码成功 - 来源: {} 格式: {:?} 尺寸: {}x{}",
            raw.source_hint,
            format,
            width,
            height
        );

        Ok(DecodedImage {
            image: decoded,
            format,
        })
    }

    /// 仅通过内存中的图片头信息读取宽高。
    ///
    /// 用于在完整解码前做像素限制检查。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), SplitError> {
        let cursor = Cursor::new(bytes);
        let reader = ImageReader::new(cursor)
            .with_guessed_format()
            .map_err(|e| SplitError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| SplitError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
    }

    /// 校验像素数量是否超过配置上限。
    fn validate_pixel_limits(
        &self,
        config: &SplitConfig,
        width: u32,
        height: u32,
    ) -> Result<(), SplitError> {
        let pixels = u64::from(width)
            .checked_mul(u64::from(height))
            .ok_or_else(|| SplitError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > config.max_decoded_pixels {
            return Err(SplitError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    fn validate_decoded_memory_limits(
        &self,
        config: &SplitConfig,
        width: u32,
        height: u32,
    ) -> Result<(), SplitError> {
        let estimated = u64::from(width)
            .checked_mul(u64::from(height))
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| SplitError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > config.max_decoded_bytes {
            return Err(SplitError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                config.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }
}
