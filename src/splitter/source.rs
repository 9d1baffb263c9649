//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `ImageSource` 表示外部来源语义
//! - `RawImageData` 表示已加载但未解码的字节
//! - `DecodedImage` 表示解码后的像素数据与识别出的输入格式
//! - `QuadrantTile` / `SplitOutput` 表示最终的象限切片输出

use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, ImageFormat};

use super::geometry::{Quadrant, QuadrantRegion};

/// 图片输入来源。
pub enum ImageSource {
    /// 内存中的编码图片字节（主要契约形态）。
    Bytes(Vec<u8>),
    /// Base64（支持 Data URL 与纯 Base64 字符串）。
    Base64(String),
    /// 本地文件路径来源。
    FilePath(String),
}

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}

/// 解码阶段输出：像素数据与按签名识别的输入格式。
pub(crate) struct DecodedImage {
    pub(crate) image: DynamicImage,
    pub(crate) format: ImageFormat,
}

/// 单个象限的编码输出切片。
pub struct QuadrantTile {
    /// 象限位置。
    pub quadrant: Quadrant,
    /// 该切片在整图中的区域。
    pub region: QuadrantRegion,
    /// 输出编码格式。
    pub format: ImageFormat,
    /// 编码后的图片字节。
    pub bytes: Vec<u8>,
}

impl QuadrantTile {
    /// 渲染为 Data URL，供宿主直接内联展示。
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.to_mime_type(),
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// 一次拆分的完整输出。
///
/// 顺序约定固定为：左上、右上、左下、右下。
pub struct SplitOutput {
    pub top_left: QuadrantTile,
    pub top_right: QuadrantTile,
    pub bottom_left: QuadrantTile,
    pub bottom_right: QuadrantTile,
}

impl SplitOutput {
    /// 按固定顺序借用四个切片。
    pub fn tiles(&self) -> [&QuadrantTile; 4] {
        [
            &self.top_left,
            &self.top_right,
            &self.bottom_left,
            &self.bottom_right,
        ]
    }

    /// 按固定顺序取出四个切片。
    pub fn into_tiles(self) -> [QuadrantTile; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }
}
