//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `SplitConfig`，保证运行时行为可观测、可调整、可测试。
//! 其中编码档位（quality / balanced / speed）作为高层语义，映射到底层编码参数组合。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的平衡配置。
//! - `EncodingProfile` 负责档位字符串解析与反向输出。
//! - `apply_encoding_profile` 将档位转换为具体编码参数。
//! - `infer_encoding_profile` 用于从当前配置反推档位（给宿主展示状态）。

use image::ImageFormat;
use image::codecs::png::CompressionType;

use super::SplitError;
use super::geometry::RoundingPolicy;

/// 象限拆分配置。
///
/// 字段覆盖了加载、解码与重编码三个阶段。
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// 读取原始字节时允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 输出编码策略（默认保持输入编码）。
    pub output_format: OutputFormatPolicy,
    /// 奇数边长的舍入策略。
    pub rounding: RoundingPolicy,
    /// 是否在阻塞线程池上并行编码四个象限。
    pub parallel_encode: bool,
    /// JPEG 输出质量（1~100）。
    pub jpeg_quality: u8,
    /// PNG 输出压缩档位。
    pub png_compression: PngCompression,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            output_format: OutputFormatPolicy::Preserve,
            rounding: RoundingPolicy::RemainderToFar,
            parallel_encode: true,
            jpeg_quality: 85,
            png_compression: PngCompression::Default,
        }
    }
}

/// 输出编码策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatPolicy {
    /// 保持输入编码（按文件签名识别的格式原样重编码）。
    Preserve,
    /// 统一输出 PNG。
    Png,
    /// 统一输出 JPEG。
    Jpeg,
}

impl OutputFormatPolicy {
    /// 从外部字符串解析策略。
    pub(crate) fn from_str(policy: &str) -> Result<Self, SplitError> {
        match policy.trim().to_lowercase().as_str() {
            "preserve" => Ok(Self::Preserve),
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            other => Err(SplitError::InvalidFormat(format!(
                "未知输出编码策略：{}（可选：preserve / png / jpeg）",
                other
            ))),
        }
    }

    /// 将策略输出为稳定字符串，供宿主展示与持久化。
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Preserve => "preserve",
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    /// 结合输入格式解析出实际的输出格式。
    pub(crate) fn resolve(self, source_format: ImageFormat) -> ImageFormat {
        match self {
            Self::Preserve => source_format,
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// PNG 压缩档位。
///
/// 对 `image` 编码器压缩参数的稳定封装，便于比较与配置反推。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngCompression {
    Fast,
    Default,
    Best,
}

impl PngCompression {
    pub(crate) fn to_codec(self) -> CompressionType {
        match self {
            Self::Fast => CompressionType::Fast,
            Self::Default => CompressionType::Default,
            Self::Best => CompressionType::Best,
        }
    }
}

/// 编码档位（面向宿主/用户语义）。
///
/// - `Quality`：尽量保真
/// - `Balanced`：质量与性能平衡
/// - `Speed`：优先编码速度
#[derive(Debug, Clone, Copy)]
pub enum EncodingProfile {
    Quality,
    Balanced,
    Speed,
}

impl EncodingProfile {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use quadsplit::splitter::EncodingProfile;
    ///
    /// let p = EncodingProfile::from_str("balanced")?;
    /// assert_eq!(p.as_str(), "balanced");
    /// # Ok::<(), quadsplit::splitter::SplitError>(())
    /// ```
    pub(crate) fn from_str(profile: &str) -> Result<Self, SplitError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(SplitError::InvalidFormat(format!(
                "未知编码档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    /// 将档位输出为稳定字符串，供宿主展示与持久化。
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

impl SplitConfig {
    /// 基于当前参数反推编码档位。
    ///
    /// 用于“当前生效档位”查询场景。
    pub(crate) fn infer_encoding_profile(&self) -> EncodingProfile {
        if self.png_compression == PngCompression::Best && self.jpeg_quality >= 95 {
            return EncodingProfile::Quality;
        }

        if self.png_compression == PngCompression::Fast || self.jpeg_quality <= 75 {
            return EncodingProfile::Speed;
        }

        EncodingProfile::Balanced
    }

    /// 应用指定编码档位到实际参数。
    ///
    /// 保持“档位语义稳定”，便于宿主按档位切换而无需了解底层细节。
    pub(crate) fn apply_encoding_profile(&mut self, profile: EncodingProfile) {
        match profile {
            EncodingProfile::Quality => {
                self.png_compression = PngCompression::Best;
                self.jpeg_quality = 95;
            }
            EncodingProfile::Balanced => {
                self.png_compression = PngCompression::Default;
                self.jpeg_quality = 85;
            }
            EncodingProfile::Speed => {
                self.png_compression = PngCompression::Fast;
                self.jpeg_quality = 75;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_apply_then_infer_roundtrip() {
        let mut config = SplitConfig::default();

        for profile in [
            EncodingProfile::Quality,
            EncodingProfile::Balanced,
            EncodingProfile::Speed,
        ] {
            config.apply_encoding_profile(profile);
            assert_eq!(config.infer_encoding_profile().as_str(), profile.as_str());
        }
    }

    #[test]
    fn profile_parse_rejects_unknown_values() {
        assert!(matches!(
            EncodingProfile::from_str("ultra"),
            Err(SplitError::InvalidFormat(_))
        ));
        assert!(EncodingProfile::from_str(" Quality ").is_ok());
    }

    #[test]
    fn output_format_policy_resolves_against_source() {
        assert_eq!(
            OutputFormatPolicy::Preserve.resolve(ImageFormat::Jpeg),
            ImageFormat::Jpeg
        );
        assert_eq!(
            OutputFormatPolicy::Png.resolve(ImageFormat::Jpeg),
            ImageFormat::Png
        );
        assert_eq!(
            OutputFormatPolicy::from_str("jpg").expect("parse should succeed"),
            OutputFormatPolicy::Jpeg
        );
    }
}
