//! # Transform Service
//!
//! シーケンスに対する純粋な変換サービス

/// リスト変換サービス
///
/// 外部依存を持たない純粋関数のみで構成される
pub struct TransformService;

impl TransformService {
    /// 各要素の文字順を反転した新しいリストを返す
    ///
    /// 要素数と位置は保持される。空の入力は空の出力になる
    pub fn reverse_strings(strings: &[String]) -> Vec<String> {
        strings.iter().map(|s| s.chars().rev().collect()).collect()
    }

    /// 2で割り切れる要素だけを元の順序のまま返す
    pub fn filter_even(numbers: &[i64]) -> Vec<i64> {
        numbers.iter().copied().filter(|n| n % 2 == 0).collect()
    }
}
