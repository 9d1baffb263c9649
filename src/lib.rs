//! # 图像象限拆分工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            宿主应用（桌面壳 / IPC / 文件 I/O）            │
//! │                                                          │
//! │   提供编码图片字节，消费四个象限切片                     │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ ImageSource → SplitOutput（Result<T, SplitError>）
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕             quadsplit (Rust)                     │
//! │                                                          │
//! │  splitter                                                │
//! │    ├─ service ──── SplitServiceState（状态注入 + 取消）  │
//! │    ├─ handler ──── 编排 + 阶段耗时日志                   │
//! │    ├─ loader ───── 字节/Base64/文件加载 + 签名校验       │
//! │    ├─ pipeline ─── 解码 + 像素/内存限制                  │
//! │    ├─ geometry ─── 象限区域计算（纯函数）                │
//! │    ├─ encoder ──── 裁剪 + 重编码（可并行）               │
//! │    └─ config/error/source  配置、错误、数据模型          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`splitter`] | 把一张编码图片拆分为左上、右上、左下、右下四个象限切片 |
//!
//! 拆分是一次性的纯变换：同一输入多次调用产出逐字节一致的切片，
//! 四个切片要么全部产出，要么整次调用失败。

pub mod splitter;

pub use splitter::{
    EncodingProfile, ImageSource, OutputFormatPolicy, PngCompression, Quadrant, QuadrantRegion,
    QuadrantTile, RoundingPolicy, SplitAdvancedConfig, SplitConfig, SplitError, SplitHandler,
    SplitOutput, SplitServiceState,
};
