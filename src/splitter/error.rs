//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载拆分链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! 所有错误均不可在组件内部重试：它们反映的是非法或不受支持的输入，
//! 必须原样上抛给调用方，不允许吞掉或仅记录日志。

use serde::Serialize;

/// 象限拆分统一错误类型。
///
/// 该类型会透传给宿主侧，宿主按 [`SplitError::code`] 聚合告警。
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    /// 解码失败，或图片尺寸不足以四等分。
    #[error("解码错误：{0}")]
    Decode(String),

    /// 某个象限裁剪后重编码失败。整次调用失败，不返回部分结果。
    #[error("编码错误：{0}")]
    Encode(String),

    /// 输入不是可识别的图片编码。
    #[error("格式错误：{0}")]
    InvalidFormat(String),

    /// 本地文件来源读取失败。
    #[error("文件错误：{0}")]
    FileSystem(String),

    /// 输入超过体积/像素/内存上限，或内部锁异常。
    #[error("资源限制：{0}")]
    ResourceLimit(String),

    /// 调用方在处理完成前取消了请求。
    #[error("已取消：{0}")]
    Cancelled(String),
}

impl SplitError {
    /// 稳定错误码，供宿主侧聚合与告警使用。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "E_DECODE",
            Self::Encode(_) => "E_ENCODE",
            Self::InvalidFormat(_) => "E_INVALID_FORMAT",
            Self::FileSystem(_) => "E_FILESYSTEM",
            Self::ResourceLimit(_) => "E_RESOURCE_LIMIT",
            Self::Cancelled(_) => "E_CANCELLED",
        }
    }

    /// 错误发生的流水线阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidFormat(_) | Self::FileSystem(_) => "load",
            Self::Decode(_) => "decode",
            Self::Encode(_) => "encode",
            Self::ResourceLimit(_) => "limit",
            Self::Cancelled(_) => "cancelled",
        }
    }
}

impl From<SplitError> for String {
    /// 兼容部分仍使用字符串错误的调用点。
    fn from(error: SplitError) -> Self {
        error.to_string()
    }
}

/// 宿主 IPC 要求返回值实现 `Serialize`。
/// 将错误序列化为人类可读的字符串。
impl Serialize for SplitError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(SplitError::Decode("x".to_string()).code(), "E_DECODE");
        assert_eq!(SplitError::Encode("x".to_string()).code(), "E_ENCODE");
        assert_eq!(SplitError::Cancelled("x".to_string()).stage(), "cancelled");
    }

    #[test]
    fn error_serializes_as_readable_string() {
        let error = SplitError::InvalidFormat("不支持的图片格式".to_string());
        let json = serde_json::to_string(&error).expect("serialize should succeed");
        assert!(json.contains("格式错误"));
    }
}
