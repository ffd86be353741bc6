//! Static activity catalog.
//!
//! One row per [`WeatherCategory`], one column per [`Language`], five
//! suggestions per cell in display order. The array types make a partial
//! table a compile error.

use outly_core::Language;
use serde::Serialize;

use crate::classifier::WeatherCategory;

pub const SUGGESTIONS_PER_CATEGORY: usize = 5;

/// A single recommended activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivitySuggestion {
    pub name: &'static str,
    /// Opaque icon identifier for the client to render
    #[serde(rename = "icon")]
    pub icon_ref: &'static str,
    /// Short note on why it suits the weather
    #[serde(rename = "condition")]
    pub condition_note: &'static str,
    pub recommended: bool,
}

const fn pick(name: &'static str, icon_ref: &'static str, condition_note: &'static str) -> ActivitySuggestion {
    ActivitySuggestion {
        name,
        icon_ref,
        condition_note,
        recommended: true,
    }
}

type Cell = [ActivitySuggestion; SUGGESTIONS_PER_CATEGORY];

/// Indexed by `[category.index()][language.index()]`.
static CATALOG: [[Cell; 2]; 4] = [
    // rain
    [
        [
            pick("Indoor Gym", "dumbbell", "Stay dry and active"),
            pick("Museum Visit", "landmark", "Cultural experience"),
            pick("Shopping Mall", "shopping-bag", "Indoor entertainment"),
            pick("Cafe Work", "coffee", "Cozy atmosphere"),
            pick("Movie Theater", "film", "Perfect rainy day activity"),
        ],
        [
            pick("屋内ジム", "dumbbell", "乾いたまま運動できます"),
            pick("博物館見学", "landmark", "文化的な体験"),
            pick("ショッピングモール", "shopping-bag", "屋内エンターテイメント"),
            pick("カフェで仕事", "coffee", "居心地の良い雰囲気"),
            pick("映画館", "film", "雨の日に最適"),
        ],
    ],
    // cold
    [
        [
            pick("Winter Hiking", "hiking", "Dress warm"),
            pick("Hot Spring", "hot-tub", "Warm relaxation"),
            pick("Winter Sports", "skiing", "Cold weather fun"),
            pick("Indoor Climbing", "mountain", "Stay active indoors"),
            pick("Cozy Cafe", "coffee", "Warm beverages"),
        ],
        [
            pick("冬のハイキング", "hiking", "暖かく着る"),
            pick("温泉", "hot-tub", "温かいリラクゼーション"),
            pick("ウィンタースポーツ", "skiing", "寒い天気の楽しみ"),
            pick("室内クライミング", "mountain", "屋内でアクティブに"),
            pick("居心地の良いカフェ", "coffee", "温かい飲み物"),
        ],
    ],
    // hot
    [
        [
            pick("Beach Visit", "umbrella-beach", "Perfect beach weather"),
            pick("Swimming", "swimmer", "Cool off in water"),
            pick("Early Morning Run", "running", "Beat the heat"),
            pick("Park Picnic", "tree", "Enjoy outdoors"),
            pick("Ice Cream Walk", "ice-cream", "Sweet treat stroll"),
        ],
        [
            pick("ビーチ訪問", "umbrella-beach", "完璧なビーチの天気"),
            pick("水泳", "swimmer", "水で涼む"),
            pick("早朝ランニング", "running", "暑さを避ける"),
            pick("公園でピクニック", "tree", "屋外を楽しむ"),
            pick("アイスクリーム散歩", "ice-cream", "甘いお菓子の散歩"),
        ],
    ],
    // mild
    [
        [
            pick("Jogging", "running", "Perfect temperature"),
            pick("Cycling", "bicycle", "Great for biking"),
            pick("Park Walk", "walking", "Pleasant conditions"),
            pick("Outdoor Yoga", "spa", "Comfortable weather"),
            pick("Photography", "camera", "Good lighting"),
        ],
        [
            pick("ジョギング", "running", "完璧な温度"),
            pick("サイクリング", "bicycle", "自転車に最適"),
            pick("公園散歩", "walking", "快適な条件"),
            pick("屋外ヨガ", "spa", "快適な天気"),
            pick("写真撮影", "camera", "良い照明"),
        ],
    ],
];

/// The five suggestions for `category` in `language`, in display order.
pub fn lookup(category: WeatherCategory, language: Language) -> &'static Cell {
    &CATALOG[category.index()][language.index()]
}
