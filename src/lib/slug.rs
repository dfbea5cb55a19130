use diacritics::remove_diacritics;

fn fold_turkish(c: char) -> char {
  match c {
    'ı' | 'İ' => 'i',
    'ş' | 'Ş' => 's',
    'ğ' | 'Ğ' => 'g',
    'ç' | 'Ç' => 'c',
    'ö' | 'Ö' => 'o',
    'ü' | 'Ü' => 'u',
    _ => c,
  }
}

/*
* Category URL key: "Şarküteri & Peynir" -> "sarkuteri-peynir"
*/
pub fn slugify(title: &str) -> String {
  let folded: String = title.chars().map(fold_turkish).collect();
  let plain = remove_diacritics(&folded).to_lowercase();
  plain
    .split(|c: char| !c.is_ascii_alphanumeric())
    .filter(|part| part.len() > 0)
    .collect::<Vec<&str>>()
    .join("-")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_turkish_titles() {
    assert_eq!(slugify("Şarküteri & Peynir"), "sarkuteri-peynir");
    assert_eq!(slugify("Çiğ Süt Ürünleri"), "cig-sut-urunleri");
    assert_eq!(slugify("  IŞIK  "), "isik");
  }

  #[test]
  fn test_other_accents_and_symbols() {
    assert_eq!(slugify("Crème brûlée!"), "creme-brulee");
    assert_eq!(slugify("---"), "");
  }
}
