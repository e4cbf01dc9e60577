//! 組み込みの翻訳更新セット
//!
//! 設定ファイルで `translations.updates` を指定しない場合に使用する。

use crate::merge::TranslationUpdate;

/// `(key, en, ru)`
const BUILTIN: &[(&str, &str, &str)] = &[
    ("all_filter", "All", "Все"),
    ("revenue", "Revenue", "Выручка"),
    ("cost", "Cost", "Расходы"),
    ("net_profit", "Net Profit", "Чистая прибыль"),
    ("search_vehicle_or_buyer", "Search vehicle or buyer...", "Поиск авто или покупателя..."),
    ("no_expenses_period", "No expenses for this period", "Нет расходов за этот период"),
    ("spending_breakdown", "Spending Breakdown", "Структура расходов"),
    ("sales_history", "Sales History", "История продаж"),
    ("sales", "Sales", "Продажи"),
    ("debts", "Debts", "Долги"),
    ("search_name_or_notes", "Search name or notes...", "Поиск по имени или заметкам..."),
    ("no_sales_yet", "No sales yet", "Продаж пока нет"),
    (
        "record_first_sale",
        "Record your first sale to see it here.",
        "Запишите свою первую продажу, чтобы увидеть ее здесь.",
    ),
    ("search", "Search", "Поиск"),
    ("done", "Done", "Готово"),
];

/// 組み込みの更新セットを返す
#[must_use]
pub fn builtin_updates() -> Vec<TranslationUpdate> {
    BUILTIN
        .iter()
        .map(|(key, default_value, secondary_value)| {
            TranslationUpdate::new(*key, *default_value, *secondary_value)
        })
        .collect()
}
