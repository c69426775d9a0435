use crate::types::RawRow;
use serde_json::{json, Value};

/// Built-in order sheet behind the "load sample data" action.
pub fn sample_rows() -> Vec<RawRow> {
    let rows = json!([
        {"売上請求日": "2024-04-03", "顧客名": "青空商事", "担当者": "佐藤", "商品名": "パンフレット", "地域": "東京", "数量": 500, "金額": "¥180,000", "デザイン": "○", "企画": "○"},
        {"売上請求日": "2024-04-11", "顧客名": "みどり製菓", "担当者": "鈴木", "商品名": "ポスター", "地域": "大阪", "数量": 200, "金額": "¥96,000", "デザイン": "○", "企画": ""},
        {"売上請求日": "2024-04-18", "顧客名": "青空商事", "担当者": "佐藤", "商品名": "名刺", "地域": "東京", "数量": 1000, "金額": "¥32,000", "デザイン": "", "企画": ""},
        {"売上請求日": "2024-04-25", "顧客名": "北斗工業", "担当者": "高橋", "商品名": "カタログ", "地域": "名古屋", "数量": 300, "金額": "¥240,000", "デザイン": "", "企画": ""},
        {"売上請求日": "2024-05-02", "顧客名": "みどり製菓", "担当者": "鈴木", "商品名": "パッケージ", "地域": "大阪", "数量": 2000, "金額": "¥410,000", "デザイン": "○", "企画": "○"},
        {"売上請求日": "2024-05-09", "顧客名": "青空商事", "担当者": "佐藤", "商品名": "ポスター", "地域": "東京", "数量": 150, "金額": "¥72,000", "デザイン": "○", "企画": ""},
        {"売上請求日": "2024-05-16", "顧客名": "北斗工業", "担当者": "高橋", "商品名": "名刺", "地域": "名古屋", "数量": 800, "金額": "¥25,600", "デザイン": "", "企画": ""},
        {"売上請求日": "2024-05-23", "顧客名": "さくら不動産", "担当者": "佐藤", "商品名": "チラシ", "地域": "東京", "数量": 5000, "金額": "¥150,000", "デザイン": "○", "企画": "○"},
        {"売上請求日": "2024-06-04", "顧客名": "みどり製菓", "担当者": "鈴木", "商品名": "パッケージ", "地域": "大阪", "数量": 1500, "金額": "¥330,000", "デザイン": "", "企画": "○"},
        {"売上請求日": "2024-06-12", "顧客名": "青空商事", "担当者": "高橋", "商品名": "パンフレット", "地域": "東京", "数量": 400, "金額": "¥150,000", "デザイン": "○", "企画": ""},
        {"売上請求日": "2024-06-20", "顧客名": "北斗工業", "担当者": "高橋", "商品名": "カタログ", "地域": "名古屋", "数量": 250, "金額": "¥205,000", "デザイン": "", "企画": ""},
        {"売上請求日": "2024-06-27", "顧客名": "みどり製菓", "担当者": "鈴木", "商品名": "ポスター", "地域": "大阪", "数量": 100, "金額": "¥48,000", "デザイン": "", "企画": ""}
    ]);
    match rows {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
