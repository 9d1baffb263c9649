//! 象限几何计算模块
//!
//! 该模块实现“整图 → 四象限”的核心几何算法，全部为纯函数：
//! 输入为图像宽高与舍入策略，输出唯一的矩形区域，便于测试。
//!
//! # 设计思路
//!
//! - 近端（左/上）取 `floor(extent / 2)`，远端（右/下）取余下部分，
//!   保证四个区域无缝、无重叠地覆盖整图。
//! - 奇数边长时两端恰好相差一个像素，多出的一像素默认归远端，
//!   也可通过 [`RoundingPolicy`] 改为归近端。
//! - 宽或高小于 2 时近端区域退化为 0 宽/高，由解码层提前拒绝，
//!   几何层本身不做输入兜底。

use super::SplitError;

/// 四个固定象限位置。
///
/// [`Quadrant::ORDERED`] 定义了整个 crate 的输出顺序约定。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// 固定输出顺序：左上、右上、左下、右下。
    pub const ORDERED: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// 稳定字符串标识，供日志与宿主展示。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }

    fn is_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }

    fn is_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }
}

/// 象限矩形区域（像素坐标，原点在整图左上角）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadrantRegion {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl QuadrantRegion {
    /// 区域像素面积。
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// 奇数边长的舍入策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingPolicy {
    /// 多出的一像素归远端（右/下）。
    #[default]
    RemainderToFar,
    /// 多出的一像素归近端（左/上）。
    RemainderToNear,
}

impl RoundingPolicy {
    /// 从外部字符串解析策略。
    pub(crate) fn from_str(policy: &str) -> Result<Self, SplitError> {
        match policy.trim().to_lowercase().as_str() {
            "remainder-to-far" => Ok(Self::RemainderToFar),
            "remainder-to-near" => Ok(Self::RemainderToNear),
            other => Err(SplitError::InvalidFormat(format!(
                "未知舍入策略：{}（可选：remainder-to-far / remainder-to-near）",
                other
            ))),
        }
    }

    /// 将策略输出为稳定字符串，供宿主展示与持久化。
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::RemainderToFar => "remainder-to-far",
            Self::RemainderToNear => "remainder-to-near",
        }
    }
}

/// 将一条边拆分为（近端长度，远端长度）。
///
/// 不变量：两段之和恒等于 `extent`，奇数时两段相差恰好 1。
fn split_axis(extent: u32, policy: RoundingPolicy) -> (u32, u32) {
    let half = extent / 2;
    match policy {
        RoundingPolicy::RemainderToFar => (half, extent - half),
        RoundingPolicy::RemainderToNear => (extent - half, half),
    }
}

/// 计算单个象限在整图中的矩形区域。
///
/// # 参数
/// * `width` / `height` - 整图像素尺寸
/// * `quadrant`         - 目标象限
/// * `policy`           - 奇数边长的舍入策略
///
/// # 返回
/// 该象限的矩形区域（左上角坐标 + 宽高）
pub fn quadrant_region(
    width: u32,
    height: u32,
    quadrant: Quadrant,
    policy: RoundingPolicy,
) -> QuadrantRegion {
    let (near_w, far_w) = split_axis(width, policy);
    let (near_h, far_h) = split_axis(height, policy);

    let (left, region_width) = if quadrant.is_left() {
        (0, near_w)
    } else {
        (near_w, far_w)
    };
    let (top, region_height) = if quadrant.is_top() {
        (0, near_h)
    } else {
        (near_h, far_h)
    };

    QuadrantRegion {
        left,
        top,
        width: region_width,
        height: region_height,
    }
}

/// 按固定顺序计算四个象限区域。
///
/// 四个区域恰好无缝、无重叠地覆盖整图：面积之和等于 `width * height`，
/// 且任意两个区域不相交。
pub fn quadrant_regions(
    width: u32,
    height: u32,
    policy: RoundingPolicy,
) -> [(Quadrant, QuadrantRegion); 4] {
    Quadrant::ORDERED.map(|quadrant| (quadrant, quadrant_region(width, height, quadrant, policy)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_image_splits_into_equal_quadrants() {
        let regions = quadrant_regions(4, 4, RoundingPolicy::RemainderToFar);

        let expected = [
            (Quadrant::TopLeft, (0, 0, 2, 2)),
            (Quadrant::TopRight, (2, 0, 2, 2)),
            (Quadrant::BottomLeft, (0, 2, 2, 2)),
            (Quadrant::BottomRight, (2, 2, 2, 2)),
        ];

        for ((quadrant, region), (expected_quadrant, (left, top, width, height))) in
            regions.into_iter().zip(expected)
        {
            assert_eq!(quadrant, expected_quadrant);
            assert_eq!(region.left, left);
            assert_eq!(region.top, top);
            assert_eq!(region.width, width);
            assert_eq!(region.height, height);
        }
    }

    #[test]
    fn test_odd_image_gives_remainder_to_far_side() {
        let regions = quadrant_regions(5, 5, RoundingPolicy::RemainderToFar);

        let expected = [
            (0, 0, 2, 2),
            (2, 0, 3, 2),
            (0, 2, 2, 3),
            (2, 2, 3, 3),
        ];

        for ((_, region), (left, top, width, height)) in regions.into_iter().zip(expected) {
            assert_eq!(
                (region.left, region.top, region.width, region.height),
                (left, top, width, height)
            );
        }

        let total: u64 = regions.iter().map(|(_, r)| r.area()).sum();
        assert_eq!(total, 25);
    }

    #[test]
    fn test_odd_image_remainder_to_near_side() {
        let regions = quadrant_regions(5, 5, RoundingPolicy::RemainderToNear);

        let expected = [
            (0, 0, 3, 3),
            (3, 0, 2, 3),
            (0, 3, 3, 2),
            (3, 3, 2, 2),
        ];

        for ((_, region), (left, top, width, height)) in regions.into_iter().zip(expected) {
            assert_eq!(
                (region.left, region.top, region.width, region.height),
                (left, top, width, height)
            );
        }
    }

    #[test]
    fn test_regions_partition_area_for_mixed_parity() {
        for (width, height) in [(2, 2), (3, 2), (2, 3), (7, 11), (1920, 1081)] {
            for policy in [RoundingPolicy::RemainderToFar, RoundingPolicy::RemainderToNear] {
                let regions = quadrant_regions(width, height, policy);
                let total: u64 = regions.iter().map(|(_, r)| r.area()).sum();
                assert_eq!(total, u64::from(width) * u64::from(height));
            }
        }
    }

    #[test]
    fn test_far_side_is_at_most_one_pixel_larger() {
        let regions = quadrant_regions(9, 6, RoundingPolicy::RemainderToFar);
        let (_, top_left) = regions[0];
        let (_, bottom_right) = regions[3];

        assert_eq!(bottom_right.width - top_left.width, 1);
        assert_eq!(bottom_right.height, top_left.height);
        assert_eq!(top_left.width + bottom_right.width, 9);
        assert_eq!(top_left.height + bottom_right.height, 6);
    }

    #[test]
    fn test_minimum_two_by_two_image() {
        let regions = quadrant_regions(2, 2, RoundingPolicy::RemainderToFar);

        for (_, region) in regions {
            assert_eq!(region.width, 1);
            assert_eq!(region.height, 1);
        }
    }

    #[test]
    fn test_rounding_policy_string_roundtrip() {
        let far = RoundingPolicy::from_str("remainder-to-far").expect("parse should succeed");
        assert_eq!(far, RoundingPolicy::RemainderToFar);
        assert_eq!(far.as_str(), "remainder-to-far");

        let near = RoundingPolicy::from_str(" Remainder-To-Near ").expect("parse should succeed");
        assert_eq!(near, RoundingPolicy::RemainderToNear);

        assert!(matches!(
            RoundingPolicy::from_str("round-up"),
            Err(SplitError::InvalidFormat(_))
        ));
    }
}
