//! # 服务层（可注入状态）
//!
//! ## 设计思路
//!
//! 使用 `SplitServiceState` 作为宿主注入状态，替代全局单例函数。
//! 好处：
//! 1. 生命周期清晰（由宿主统一管理）
//! 2. 测试可创建独立实例，减少共享状态副作用
//! 3. 后续可扩展多实例或按会话配置
//!
//! ## 实现思路
//!
//! 对外仅暴露少量稳定 API：
//! - `split_source`：执行完整拆分链路
//! - `split_source_with_cancel`：按请求 ID 注册取消标志后执行
//! - `cancel_split`：标记指定请求取消
//! - 编码档位与高级配置的读写

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::config::EncodingProfile;
use super::source::{ImageSource, SplitOutput};
use super::{SplitConfig, SplitError, SplitHandler};

/// 高级配置的宿主传输形态。
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SplitAdvancedConfig {
    pub max_file_size: u64,
    pub max_decoded_pixels: u64,
    pub max_decoded_bytes: u64,
    pub jpeg_quality: u8,
    pub parallel_encode: bool,
    pub output_format: String,
    pub rounding: String,
}

/// 象限拆分服务状态。
///
/// 作为宿主托管状态注入到调用层，内部持有 `SplitHandler`。
pub struct SplitServiceState {
    handler: SplitHandler,
    cancel_flags: Mutex<HashMap<String, Arc<AtomicBool>>>,
}

impl SplitServiceState {
    /// 使用默认配置创建服务状态。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use quadsplit::splitter::SplitServiceState;
    ///
    /// let service = SplitServiceState::new()?;
    /// # Ok::<(), quadsplit::splitter::SplitError>(())
    /// ```
    pub fn new() -> Result<Self, SplitError> {
        Self::with_config(SplitConfig::default())
    }

    /// 使用自定义配置创建服务状态。
    ///
    /// 主要用于测试或按场景注入不同策略。
    pub fn with_config(config: SplitConfig) -> Result<Self, SplitError> {
        let handler = SplitHandler::new(config)?;
        Ok(Self {
            handler,
            cancel_flags: Mutex::new(HashMap::new()),
        })
    }

    /// 执行完整拆分流程：加载→解码→四象限编码。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use quadsplit::splitter::{ImageSource, SplitServiceState};
    ///
    /// # async fn demo(png: Vec<u8>) -> Result<(), quadsplit::splitter::SplitError> {
    /// let service = SplitServiceState::new()?;
    /// let output = service.split_source(ImageSource::Bytes(png)).await?;
    /// for tile in output.tiles() {
    ///     println!("{} -> {} 字节", tile.quadrant.as_str(), tile.bytes.len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn split_source(&self, source: ImageSource) -> Result<SplitOutput, SplitError> {
        self.handler.split(source).await
    }

    /// 按请求 ID 注册取消标志后执行拆分。
    ///
    /// 标志在阶段之间被检查；请求结束后标志自动清理。
    pub async fn split_source_with_cancel(
        &self,
        request_id: String,
        source: ImageSource,
    ) -> Result<SplitOutput, SplitError> {
        let cancel_flag = Arc::new(AtomicBool::new(false));
        {
            let mut guard = self
                .cancel_flags
                .lock()
                .map_err(|_| SplitError::ResourceLimit("取消标志锁已中毒".to_string()))?;
            guard.insert(request_id.clone(), Arc::clone(&cancel_flag));
        }

        let flag_for_hook = Arc::clone(&cancel_flag);
        let result = self
            .handler
            .split_with_hooks(source, move || flag_for_hook.load(Ordering::SeqCst))
            .await;

        {
            let mut guard = self
                .cancel_flags
                .lock()
                .map_err(|_| SplitError::ResourceLimit("取消标志锁已中毒".to_string()))?;
            guard.remove(&request_id);
        }

        result
    }

    /// 标记指定请求取消。
    ///
    /// 返回 `true` 表示找到了在途请求并已标记；`false` 表示请求不存在或已结束。
    pub fn cancel_split(&self, request_id: &str) -> Result<bool, SplitError> {
        let guard = self
            .cancel_flags
            .lock()
            .map_err(|_| SplitError::ResourceLimit("取消标志锁已中毒".to_string()))?;

        if let Some(flag) = guard.get(request_id) {
            flag.store(true, Ordering::SeqCst);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// 设置编码档位。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use quadsplit::splitter::SplitServiceState;
    ///
    /// let service = SplitServiceState::new()?;
    /// service.set_encoding_profile("speed")?;
    /// # Ok::<(), quadsplit::splitter::SplitError>(())
    /// ```
    pub fn set_encoding_profile(&self, profile: &str) -> Result<(), SplitError> {
        let profile = EncodingProfile::from_str(profile)?;
        self.handler.set_encoding_profile(profile)
    }

    /// 获取当前生效编码档位（字符串）。
    pub fn get_encoding_profile(&self) -> Result<String, SplitError> {
        let profile = self.handler.get_encoding_profile()?;
        Ok(profile.as_str().to_string())
    }

    pub fn set_advanced_config(&self, config: SplitAdvancedConfig) -> Result<(), SplitError> {
        self.handler.set_advanced_config(
            config.max_file_size,
            config.max_decoded_pixels,
            config.max_decoded_bytes,
            config.jpeg_quality,
            config.parallel_encode,
            &config.output_format,
            &config.rounding,
        )
    }

    pub fn get_advanced_config(&self) -> Result<SplitAdvancedConfig, SplitError> {
        let (
            max_file_size,
            max_decoded_pixels,
            max_decoded_bytes,
            jpeg_quality,
            parallel_encode,
            output_format,
            rounding,
        ) = self.handler.get_advanced_config()?;

        Ok(SplitAdvancedConfig {
            max_file_size,
            max_decoded_pixels,
            max_decoded_bytes,
            jpeg_quality,
            parallel_encode,
            output_format: output_format.to_string(),
            rounding: rounding.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn service_set_and_get_profile_roundtrip() {
        let service = SplitServiceState::new().expect("service init failed");

        service.set_encoding_profile("quality").expect("set quality should succeed");
        let quality = service.get_encoding_profile().expect("get profile should succeed");
        assert_eq!(quality, "quality");

        service.set_encoding_profile("balanced").expect("set balanced should succeed");
        let balanced = service.get_encoding_profile().expect("get profile should succeed");
        assert_eq!(balanced, "balanced");

        service.set_encoding_profile("speed").expect("set speed should succeed");
        let speed = service.get_encoding_profile().expect("get profile should succeed");
        assert_eq!(speed, "speed");
    }

    #[test]
    fn service_rejects_invalid_profile() {
        let service = SplitServiceState::new().expect("service init failed");

        let result = service.set_encoding_profile("unknown-profile");
        assert!(matches!(result, Err(SplitError::InvalidFormat(_))));
    }

    #[test]
    fn service_profile_concurrent_access_stress() {
        let service = Arc::new(SplitServiceState::new().expect("service init failed"));

        let workers = 8;
        let iterations = 200;

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let service = Arc::clone(&service);
            handles.push(thread::spawn(move || {
                let profiles = ["quality", "balanced", "speed"];

                for i in 0..iterations {
                    let profile = profiles[(worker_id + i) % profiles.len()];
                    service.set_encoding_profile(profile).expect("set profile should succeed");

                    let current = service.get_encoding_profile().expect("get profile should succeed");
                    assert!(matches!(current.as_str(), "quality" | "balanced" | "speed"));
                }
            }));
        }

        for handle in handles {
            handle.join().expect("worker thread should not panic");
        }
    }

    #[test]
    fn cancel_split_returns_false_for_unknown_request() {
        let service = SplitServiceState::new().expect("service init failed");

        let cancelled = service
            .cancel_split("no-such-request")
            .expect("cancel should not error");
        assert!(!cancelled);
    }

    #[test]
    fn advanced_config_serializes_roundtrip() {
        let service = SplitServiceState::new().expect("service init failed");
        let config = service.get_advanced_config().expect("read advanced config failed");

        let json = serde_json::to_string(&config).expect("serialize should succeed");
        let parsed: SplitAdvancedConfig =
            serde_json::from_str(&json).expect("deserialize should succeed");

        assert_eq!(parsed.max_file_size, config.max_file_size);
        assert_eq!(parsed.output_format, "preserve");
        assert_eq!(parsed.rounding, "remainder-to-far");
    }
}
