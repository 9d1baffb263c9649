//! # 象限编码模块
//!
//! ## 设计思路
//!
//! 将“裁剪 + 重编码”的输出阶段独立出来。解码后的图像是不可变共享数据，
//! 四个象限的裁剪互不依赖，可在阻塞线程池并行执行，避免占用 async 运行时。
//!
//! ## 实现思路
//!
//! - 解码结果包进 `Arc`，四个编码任务各持一个只读引用。
//! - `parallel_encode` 关闭时退化为顺序循环，输出与并行模式逐字节一致。
//! - 任何一个象限失败则整次调用失败，不返回部分结果。
//! - JPEG 输出前统一转 RGB（JPEG 不支持透明通道）。

use std::io::Cursor;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{FilterType as PngFilterType, PngEncoder};
use image::{DynamicImage, GenericImageView, ImageFormat};

use super::config::PngCompression;
use super::geometry::{self, Quadrant, QuadrantRegion};
use super::source::{DecodedImage, QuadrantTile, SplitOutput};
use super::{SplitConfig, SplitError, SplitHandler};

impl SplitHandler {
    /// 将解码后的图像拆分为四个象限切片。
    ///
    /// 输出顺序固定：左上、右上、左下、右下。
    pub(crate) async fn encode_quadrants(
        &self,
        decoded: DecodedImage,
        config: &SplitConfig,
    ) -> Result<SplitOutput, SplitError> {
        let (width, height) = decoded.image.dimensions();
        let output_format = config.output_format.resolve(decoded.format);
        let regions = geometry::quadrant_regions(width, height, config.rounding);
        let source = Arc::new(decoded.image);

        let tiles = if config.parallel_encode {
            Self::encode_parallel(&source, regions, output_format, config).await?
        } else {
            Self::encode_sequential(&source, regions, output_format, config)?
        };

        log::debug!(
            "🧩 象限编码完成 - 格式: {:?} 切片体积: {}/{}/{}/{} 字节",
            output_format,
            tiles[0].bytes.len(),
            tiles[1].bytes.len(),
            tiles[2].bytes.len(),
            tiles[3].bytes.len()
        );

        let [top_left, top_right, bottom_left, bottom_right] = tiles;
        Ok(SplitOutput {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        })
    }

    /// 在阻塞线程池上并行编码四个象限。
    async fn encode_parallel(
        source: &Arc<DynamicImage>,
        regions: [(Quadrant, QuadrantRegion); 4],
        format: ImageFormat,
        config: &SplitConfig,
    ) -> Result<[QuadrantTile; 4], SplitError> {
        let jpeg_quality = config.jpeg_quality;
        let png_compression = config.png_compression;

        let spawn = |(quadrant, region): (Quadrant, QuadrantRegion)| {
            let source = Arc::clone(source);
            tokio::task::spawn_blocking(move || {
                Self::encode_tile(&source, quadrant, region, format, jpeg_quality, png_compression)
            })
        };

        let [r0, r1, r2, r3] = regions;
        let (t0, t1, t2, t3) = tokio::try_join!(spawn(r0), spawn(r1), spawn(r2), spawn(r3))
            .map_err(|e| SplitError::Encode(format!("编码任务执行失败：{}", e)))?;

        Ok([t0?, t1?, t2?, t3?])
    }

    /// 顺序编码四个象限。
    fn encode_sequential(
        source: &DynamicImage,
        regions: [(Quadrant, QuadrantRegion); 4],
        format: ImageFormat,
        config: &SplitConfig,
    ) -> Result<[QuadrantTile; 4], SplitError> {
        let [r0, r1, r2, r3] = regions;
        Ok([
            Self::encode_tile(source, r0.0, r0.1, format, config.jpeg_quality, config.png_compression)?,
            Self::encode_tile(source, r1.0, r1.1, format, config.jpeg_quality, config.png_compression)?,
            Self::encode_tile(source, r2.0, r2.1, format, config.jpeg_quality, config.png_compression)?,
            Self::encode_tile(source, r3.0, r3.1, format, config.jpeg_quality, config.png_compression)?,
        ])
    }

    /// 裁剪单个象限并重编码。
    fn encode_tile(
        source: &DynamicImage,
        quadrant: Quadrant,
        region: QuadrantRegion,
        format: ImageFormat,
        jpeg_quality: u8,
        png_compression: PngCompression,
    ) -> Result<QuadrantTile, SplitError> {
        let tile = source.crop_imm(region.left, region.top, region.width, region.height);
        let mut cursor = Cursor::new(Vec::new());

        match format {
            ImageFormat::Png => {
                let encoder = PngEncoder::new_with_quality(
                    &mut cursor,
                    png_compression.to_codec(),
                    PngFilterType::Adaptive,
                );
                tile.write_with_encoder(encoder).map_err(|e| {
                    SplitError::Encode(format!("{} 象限 PNG 编码失败：{}", quadrant.as_str(), e))
                })?;
            }
            ImageFormat::Jpeg => {
                let rgb = DynamicImage::ImageRgb8(tile.to_rgb8());
                let encoder = JpegEncoder::new_with_quality(&mut cursor, jpeg_quality);
                rgb.write_with_encoder(encoder).map_err(|e| {
                    SplitError::Encode(format!("{} 象限 JPEG 编码失败：{}", quadrant.as_str(), e))
                })?;
            }
            other => {
                tile.write_to(&mut cursor, other).map_err(|e| {
                    SplitError::Encode(format!(
                        "{} 象限重编码失败（{:?}）：{}",
                        quadrant.as_str(),
                        other,
                        e
                    ))
                })?;
            }
        }

        Ok(QuadrantTile {
            quadrant,
            region,
            format,
            bytes: cursor.into_inner(),
        })
    }
}
