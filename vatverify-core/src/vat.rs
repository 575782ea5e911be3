//! Splitting raw VAT identifiers into country code and number.
use thiserror::Error;

/// Errors returned while splitting a raw VAT identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VatError {
    #[error("the VAT should begin with at least 2 letters")]
    NotEnoughLetters,
}

/// A VAT identifier split into its country-code prefix and registration number.
///
/// # Examples
/// ```rust
/// use vatverify_core::vat::split_vat;
///
/// let vat = split_vat("CZ28987373")?;
/// assert_eq!(vat.country_code(), "CZ");
/// assert_eq!(vat.number(), "28987373");
/// # Ok::<(), vatverify_core::vat::VatError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vat {
    country_code: String,
    number: String,
}

impl Vat {
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn number(&self) -> &str {
        &self.number
    }
}

/// Split `pending` after its second character.
///
/// The number part is passed through untouched; the registry decides whether
/// it is well formed.
///
/// # Errors
/// Returns [`VatError::NotEnoughLetters`] when the input is shorter than two
/// characters or either of the first two characters is not a letter.
pub fn split_vat(pending: &str) -> Result<Vat, VatError> {
    // char boundary after the second character, if there is one
    let split_at = pending
        .char_indices()
        .nth(2)
        .map(|(idx, _)| idx)
        .unwrap_or(pending.len());
    let (country_code, number) = pending.split_at(split_at);

    if country_code.chars().count() != 2 || !is_all_letters(country_code) {
        return Err(VatError::NotEnoughLetters);
    }

    Ok(Vat {
        country_code: country_code.to_string(),
        number: number.to_string(),
    })
}

/// `true` when `input` is non-empty and every character is alphabetic.
pub fn is_all_letters(input: &str) -> bool {
    !input.is_empty() && input.chars().all(char::is_alphabetic)
}
