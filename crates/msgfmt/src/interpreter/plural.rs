//! CLDR plural category resolution.
//!
//! Different languages have different plural rules - English has "one" and
//! "other", while Russian has "one", "few", "many", and "other", and Arabic
//! uses all six categories: "zero", "one", "two", "few", "many", "other".
//!
//! Plural rules are cached per thread per locale and rule type to avoid
//! re-creating `PluralRules` instances on every selection.

use std::cell::RefCell;

use fixed_decimal::Decimal;
use icu_locale_core::Locale;
use icu_plurals::{PluralCategory, PluralOperands, PluralRuleType, PluralRules};

thread_local! {
    /// Per-thread cache of `PluralRules` keyed by locale and ordinal flag.
    static PLURAL_RULES_CACHE: RefCell<Vec<(Locale, bool, PluralRules)>> = const { RefCell::new(Vec::new()) };
}

/// Translate a `PluralCategory` enum to its string representation.
fn category_str(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        PluralCategory::Other => "other",
    }
}

/// Get the CLDR plural category for a number in a given locale.
///
/// Returns one of: "zero", "one", "two", "few", "many", "other". Visible
/// fraction digits count, so `1.0` is "other" in English. Locales without
/// plural data fall back to "other".
///
/// # Examples
///
/// ```
/// use fixed_decimal::Decimal;
/// use icu_locale_core::locale;
/// use msgfmt::interpreter::plural_category;
///
/// assert_eq!(plural_category(&locale!("en"), &Decimal::from(1), false), "one");
/// assert_eq!(plural_category(&locale!("en"), &Decimal::from(2), false), "other");
/// assert_eq!(plural_category(&locale!("en"), &Decimal::from(2), true), "two");
/// assert_eq!(plural_category(&locale!("ru"), &Decimal::from(5), false), "many");
/// ```
pub fn plural_category(locale: &Locale, n: &Decimal, ordinal: bool) -> &'static str {
    let operands = PluralOperands::from(n);
    PLURAL_RULES_CACHE.with_borrow_mut(|cache| {
        if let Some((_, _, rules)) = cache
            .iter()
            .find(|(cached, cached_ordinal, _)| cached == locale && *cached_ordinal == ordinal)
        {
            return category_str(rules.category_for(operands));
        }
        let rule_type = if ordinal {
            PluralRuleType::Ordinal
        } else {
            PluralRuleType::Cardinal
        };
        match PluralRules::try_new(locale.clone().into(), rule_type.into()) {
            Ok(rules) => {
                let category = category_str(rules.category_for(operands));
                cache.push((locale.clone(), ordinal, rules));
                category
            }
            Err(error) => {
                tracing::debug!(%locale, ?error, "no plural rules for locale");
                "other"
            }
        }
    })
}
