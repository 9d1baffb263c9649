//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `SplitHandler` 只负责流程编排与配置管理，不与任何宿主框架绑定。
//! 处理链路固定为：
//! 1. 读取配置快照
//! 2. 按来源加载原始字节
//! 3. 解码并校验
//! 4. 裁剪四象限并重编码
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<SplitConfig>>` 支持运行时动态调整。
//! - 单次请求内使用“同一配置快照”，避免处理中途配置漂移。
//! - 记录 `load/decode/encode/total` 阶段耗时，便于性能诊断。
//! - 取消钩子在阶段之间检查；解码本身不可中断。

use std::sync::{Arc, RwLock};
use std::time::Instant;

use super::config::EncodingProfile;
use super::source::{ImageSource, SplitOutput};
use super::{SplitConfig, SplitError};

/// 象限拆分处理器。
///
/// 封装了配置状态，并编排各子模块实现完整流程。
pub struct SplitHandler {
    pub(super) config: Arc<RwLock<SplitConfig>>,
}

impl SplitHandler {
    /// 根据初始配置创建处理器。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use quadsplit::splitter::{SplitConfig, SplitHandler};
    ///
    /// let handler = SplitHandler::new(SplitConfig::default())?;
    /// # Ok::<(), quadsplit::splitter::SplitError>(())
    /// ```
    pub fn new(config: SplitConfig) -> Result<Self, SplitError> {
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// 获取配置快照。
    ///
    /// 作用：保证单次请求链路使用一致参数。
    pub(super) fn config_snapshot(&self) -> Result<SplitConfig, SplitError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| SplitError::ResourceLimit("配置读取锁已中毒".to_string()))
    }

    /// 设置编码档位。
    pub fn set_encoding_profile(&self, profile: EncodingProfile) -> Result<(), SplitError> {
        let mut config = self
            .config
            .write()
            .map_err(|_| SplitError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        config.apply_encoding_profile(profile);

        log::info!(
            "⚙️ 已切换编码档位：{:?}（jpeg_quality={}, png_compression={:?}）",
            profile,
            config.jpeg_quality,
            config.png_compression
        );

        Ok(())
    }

    /// 获取当前生效档位。
    pub fn get_encoding_profile(&self) -> Result<EncodingProfile, SplitError> {
        let config = self
            .config
            .read()
            .map_err(|_| SplitError::ResourceLimit("配置读取锁已中毒".to_string()))?;
        Ok(config.infer_encoding_profile())
    }

    /// 设置资源上限与输出策略等高级配置。
    pub fn set_advanced_config(
        &self,
        max_file_size: u64,
        max_decoded_pixels: u64,
        max_decoded_bytes: u64,
        jpeg_quality: u8,
        parallel_encode: bool,
        output_format: &str,
        rounding: &str,
    ) -> Result<(), SplitError> {
        if max_file_size < 64 * 1024 {
            return Err(SplitError::InvalidFormat("max_file_size 不能小于 64KB".to_string()));
        }
        if max_decoded_pixels < 4 {
            return Err(SplitError::InvalidFormat("max_decoded_pixels 不能小于 4（至少 2x2）".to_string()));
        }
        if max_decoded_bytes < 8 * 1024 * 1024 {
            return Err(SplitError::InvalidFormat("max_decoded_bytes 不能小于 8MB".to_string()));
        }
        if !(1..=100).contains(&jpeg_quality) {
            return Err(SplitError::InvalidFormat("jpeg_quality 必须在 1~100 之间".to_string()));
        }

        let output_format = super::config::OutputFormatPolicy::from_str(output_format)?;
        let rounding = super::geometry::RoundingPolicy::from_str(rounding)?;

        let mut config = self
            .config
            .write()
            .map_err(|_| SplitError::ResourceLimit("配置写入锁已中毒".to_string()))?;

        config.max_file_size = max_file_size;
        config.max_decoded_pixels = max_decoded_pixels;
        config.max_decoded_bytes = max_decoded_bytes;
        config.jpeg_quality = jpeg_quality;
        config.parallel_encode = parallel_encode;
        config.output_format = output_format;
        config.rounding = rounding;

        Ok(())
    }

    /// 获取高级配置快照。
    pub fn get_advanced_config(
        &self,
    ) -> Result<(u64, u64, u64, u8, bool, &'static str, &'static str), SplitError> {
        let config = self
            .config
            .read()
            .map_err(|_| SplitError::ResourceLimit("配置读取锁已中毒".to_string()))?;

        Ok((
            config.max_file_size,
            config.max_decoded_pixels,
            config.max_decoded_bytes,
            config.jpeg_quality,
            config.parallel_encode,
            config.output_format.as_str(),
            config.rounding.as_str(),
        ))
    }

    /// 处理主入口：从任意来源加载并拆分为四象限。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use quadsplit::splitter::{ImageSource, SplitConfig, SplitHandler};
    ///
    /// # async fn demo(png: Vec<u8>) -> Result<(), quadsplit::splitter::SplitError> {
    /// let handler = SplitHandler::new(SplitConfig::default())?;
    /// let output = handler.split(ImageSource::Bytes(png)).await?;
    /// let [tl, tr, bl, br] = output.into_tiles();
    /// # Ok(())
    /// # }
    /// ```
    pub async fn split(&self, source: ImageSource) -> Result<SplitOutput, SplitError> {
        self.split_with_hooks(source, || false).await
    }

    /// 带取消钩子的处理入口。
    ///
    /// `is_cancelled` 在各阶段之间被检查；返回 `true` 时整次调用以
    /// [`SplitError::Cancelled`] 失败，不产生部分输出。
    pub async fn split_with_hooks<C>(
        &self,
        source: ImageSource,
        is_cancelled: C,
    ) -> Result<SplitOutput, SplitError>
    where
        C: Fn() -> bool + Send + Sync,
    {
        let config = self.config_snapshot()?;
        let total_start = Instant::now();

        if is_cancelled() {
            return Err(SplitError::Cancelled("拆分已在加载前取消".to_string()));
        }

        let load_start = Instant::now();
        let raw = match source {
            ImageSource::Bytes(bytes) => self.load_from_bytes(bytes, &config)?,
            ImageSource::Base64(data) => self.load_from_base64(&data, &config)?,
            ImageSource::FilePath(path) => self.load_from_file(&path, &config)?,
        };
        let load_elapsed = load_start.elapsed();

        if is_cancelled() {
            return Err(SplitError::Cancelled("拆分已在解码前取消".to_string()));
        }

        let decode_start = Instant::now();
        let decoded = self.decode_source(raw, &config)?;
        let decode_elapsed = decode_start.elapsed();

        if is_cancelled() {
            return Err(SplitError::Cancelled("拆分已在编码前取消".to_string()));
        }

        let encode_start = Instant::now();
        let output = self.encode_quadrants(decoded, &config).await?;
        let encode_elapsed = encode_start.elapsed();

        let total_elapsed = total_start.elapsed();
        log::info!(
            "✅ 象限拆分完成 - load={}ms decode={}ms encode={}ms total={}ms",
            load_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            encode_elapsed.as_millis(),
            total_elapsed.as_millis()
        );

        Ok(output)
    }
}
