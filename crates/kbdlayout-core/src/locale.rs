//! Display-name to proxy locale lookup.
//!
//! Several layouts share a locale and are told apart only by the display
//! name the vendor gives them.  The proxy name is the locale the rest of the
//! toolchain files the layout under, suffixed with a variant where one
//! locale carries more than one layout (`en-US.dvorak`).

/// Returns the proxy locale name for a layout display name.
///
/// Unknown display names yield `None`; the layout stays usable, it just has
/// no alias.
pub fn proxy_name(display_name: &str) -> Option<&'static str> {
    let name = match display_name {
        "Czech" => "cs-CZ",
        "Danish" => "da-DK",
        "German" => "de-DE",
        "Greek" => "el-GR",
        "US" => "en-US",
        "Spanish" => "es-ES",
        "Finnish" => "fi-FI.finnish",
        "French" => "fr-FR",
        "Icelandic" => "is-IS",
        "Italian" => "it-IT",
        "Dutch" => "nl-NL",
        "Norwegian" => "nb-NO",
        "Polish (Programmers)" => "pl-PL.programmers",
        "Portuguese (Brazil ABNT)" => "pt-BR.abnt",
        "Romanian (Legacy)" => "ro-RO",
        "Russian" => "ru-RU",
        "Standard" => "hr-HR",
        "Slovak" => "sk-SK",
        "Swedish" => "sv-SE",
        "Turkish Q" => "tr-TR.q",
        "Ukrainian" => "uk-UA",
        "Slovenian" => "sl-SI",
        "Estonian" => "et-EE",
        "Latvian" => "lv-LV",
        "Lithuanian IBM" => "lt-LT.ibm",
        "Macedonian" => "mk-MK",
        "Faeroese" => "fo-FO",
        "Maltese 47-Key" => "mt-MT.47",
        "Norwegian with Sami" => "se-NO",
        "Kazakh" => "kk-KZ",
        "Kyrgyz Cyrillic" => "ky-KG",
        "Tatar (Legacy)" => "tt-RU",
        "Mongolian Cyrillic" => "mn-MN",
        "United Kingdom Extended" => "cy-GB",
        "Luxembourgish" => "lb-LU",
        "Maori" => "mi-NZ",
        "Swiss German" => "de-CH",
        "United Kingdom" => "en-GB",
        "Latin American" => "es-MX",
        "Belgian French" => "fr-BE.fr",
        "Belgian (Period)" => "nl-BE",
        "Portuguese" => "pt-PT",
        "Serbian (Latin)" => "sr-La",
        "Swedish with Sami" => "se-SE",
        "Uzbek Cyrillic" => "uz-Cy",
        "Inuktitut - Latin" => "iu-La",
        "Canadian French (Legacy)" => "fr-CA",
        "Serbian (Cyrillic)" => "sr-Cy",
        "Canadian French" => "en-CA.fr",
        "Swiss French" => "fr-CH",
        "Irish" => "en-IE.irish",
        "Bosnian (Cyrillic)" => "bs-Cy",
        "Bulgarian (Latin)" => "bg-BG.latin",
        "Czech (QWERTY)" => "cs-CZ.qwerty",
        "German (IBM)" => "de-DE.ibm",
        "Greek (220)" => "el-GR.220",
        "United States-Dvorak" => "en-US.dvorak",
        "Spanish Variation" => "es-ES.variation",
        "Hungarian 101-key" => "hu-HU",
        "Italian (142)" => "it-IT.142",
        "Polish (214)" => "pl-PL",
        "Portuguese (Brazil ABNT2)" => "pt-BR.abnt2",
        "Russian (Typewriter)" => "ru-RU.typewriter",
        "Slovak (QWERTY)" => "sk-SK.qwerty",
        "Turkish F" => "tr-TR.f",
        "Latvian (QWERTY)" => "lv-LV.qwerty",
        "Lithuanian" => "lt-LT",
        "Maltese 48-Key" => "mt-MT.48",
        "Sami Extended Norway" => "se-NO.ext_norway",
        "Belgian (Comma)" => "fr-BE",
        "Finnish with Sami" => "se-SE",
        "Canadian Multilingual Standard" => "en-CA.multilingual",
        "Scottish Gaelic" => "en-IE",
        "Czech Programmers" => "cs-CZ.programmers",
        "Greek (319)" => "el-GR.319",
        "United States-International" => "en-US.international",
        "Sami Extended Finland-Sweden" => "se-SE.ext_finland_sweden",
        "Bulgarian" => "bg-BG",
        "Greek (220) Latin" => "el-GR.220_latin",
        "United States-Dvorak for left hand" => "en-US.dvorak_left",
        "Greek (319) Latin" => "el-GR.319_latin",
        "United States-Dvorak for right hand" => "en-US.dvorak_right",
        "Greek Latin" => "el-GR.latin",
        "Greek Polytonic" => "el-GR.polytonic",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_display_names_resolve() {
        assert_eq!(proxy_name("US"), Some("en-US"));
        assert_eq!(proxy_name("German"), Some("de-DE"));
        assert_eq!(
            proxy_name("Canadian Multilingual Standard"),
            Some("en-CA.multilingual")
        );
        assert_eq!(proxy_name("United States-Dvorak"), Some("en-US.dvorak"));
    }

    #[test]
    fn test_variants_may_share_a_proxy_name() {
        assert_eq!(proxy_name("Finnish with Sami"), Some("se-SE"));
        assert_eq!(proxy_name("Swedish with Sami"), Some("se-SE"));
    }

    #[test]
    fn test_lookup_is_exact() {
        assert_eq!(proxy_name("Klingon"), None);
        assert_eq!(proxy_name("us"), None);
        assert_eq!(proxy_name(" US"), None);
        assert_eq!(proxy_name(""), None);
    }
}
