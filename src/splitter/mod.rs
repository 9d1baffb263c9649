//! # 象限拆分模块（splitter）
//!
//! ## 设计思路
//!
//! 该模块将“图片来源加载 → 解码校验 → 象限几何 → 裁剪编码 → 服务暴露”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `service`：承载可注入状态（`SplitServiceState`）与取消标志
//! - `handler`：编排整条处理流水线
//! - `loader`：负责字节/Base64/文件加载与安全校验
//! - `pipeline`：负责解码、像素限制、最小尺寸校验
//! - `geometry`：象限区域计算（纯函数）
//! - `encoder`：负责裁剪与重编码（可并行）
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 实现思路
//!
//! 对外仅暴露必要类型与入口，内部细节保持 `mod` 私有。
//! 宿主通过 `SplitServiceState` 注入状态，提升测试隔离与后续扩展能力。
//!
//! ## 新同事快速上手
//!
//! 可以按下面顺序理解调用链：
//!
//! ```text
//! 宿主调用
//!    ↓
//! service.rs（状态注入、取消标志）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ loader.rs（来源加载 + 体积/签名校验）
//!    ├─ pipeline.rs（解码 + 像素限制 + 最小尺寸校验）
//!    ├─ geometry.rs（象限区域计算，纯函数）
//!    └─ encoder.rs（裁剪 + 重编码，可并行）
//!    ↓
//! 返回 SplitOutput（固定顺序：左上、右上、左下、右下）
//! ```
//!
//! ## 分层职责建议
//!
//! - 配置与策略变更优先改 `config.rs`
//! - 业务流程顺序变更优先改 `handler.rs`
//! - 单阶段行为优化分别改 `loader/pipeline/encoder`
//! - 区域划分规则变更只改 `geometry.rs`

mod config;
mod encoder;
mod error;
mod geometry;
mod handler;
mod loader;
mod pipeline;
mod service;
mod source;

pub use config::{EncodingProfile, OutputFormatPolicy, PngCompression, SplitConfig};
pub use error::SplitError;
pub use geometry::{Quadrant, QuadrantRegion, RoundingPolicy, quadrant_region, quadrant_regions};
pub use handler::SplitHandler;
pub use service::{SplitAdvancedConfig, SplitServiceState};
pub use source::{ImageSource, QuadrantTile, SplitOutput};
