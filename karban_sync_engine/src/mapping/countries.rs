/// Countries Unicommerce addresses are delivered to, keyed by ISO 3166-1 alpha-2 code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Country {
    UnitedArabEmirates,
    Afghanistan,
    Argentina,
    Austria,
    Australia,
    Bangladesh,
    Belgium,
    Bahrain,
    Brazil,
    Bhutan,
    Canada,
    Switzerland,
    China,
    Germany,
    Denmark,
    Egypt,
    Spain,
    Finland,
    France,
    UnitedKingdom,
    HongKong,
    Indonesia,
    Ireland,
    Israel,
    India,
    Italy,
    Japan,
    Kenya,
    SouthKorea,
    Kuwait,
    SriLanka,
    Mauritius,
    Maldives,
    Mexico,
    Malaysia,
    Nigeria,
    Netherlands,
    Norway,
    Nepal,
    NewZealand,
    Oman,
    Philippines,
    Pakistan,
    Poland,
    Portugal,
    Qatar,
    Russia,
    SaudiArabia,
    Sweden,
    Singapore,
    Thailand,
    Turkey,
    Taiwan,
    Tanzania,
    Uganda,
    UnitedStates,
    Vietnam,
    SouthAfrica,
}

/// The result of translating an upstream country code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryMapping {
    Mapped(Country),
    /// The code is not in the table. The address is stored without a country.
    Unmapped(String),
    /// The upstream address has no country code.
    Missing,
}

impl CountryMapping {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            None => CountryMapping::Missing,
            Some(code) => Country::from_code(code)
                .map(CountryMapping::Mapped)
                .unwrap_or_else(|| CountryMapping::Unmapped(code.to_string())),
        }
    }

    pub fn country(&self) -> Option<Country> {
        match self {
            CountryMapping::Mapped(c) => Some(*c),
            CountryMapping::Unmapped(_) | CountryMapping::Missing => None,
        }
    }

    pub fn country_name(&self) -> Option<&'static str> {
        self.country().map(|c| c.name())
    }
}

impl Country {
    pub fn from_code(code: &str) -> Option<Self> {
        use Country::*;
        let country = match code {
            "AE" => UnitedArabEmirates,
            "AF" => Afghanistan,
            "AR" => Argentina,
            "AT" => Austria,
            "AU" => Australia,
            "BD" => Bangladesh,
            "BE" => Belgium,
            "BH" => Bahrain,
            "BR" => Brazil,
            "BT" => Bhutan,
            "CA" => Canada,
            "CH" => Switzerland,
            "CN" => China,
            "DE" => Germany,
            "DK" => Denmark,
            "EG" => Egypt,
            "ES" => Spain,
            "FI" => Finland,
            "FR" => France,
            "GB" => UnitedKingdom,
            "HK" => HongKong,
            "ID" => Indonesia,
            "IE" => Ireland,
            "IL" => Israel,
            "IN" => India,
            "IT" => Italy,
            "JP" => Japan,
            "KE" => Kenya,
            "KR" => SouthKorea,
            "KW" => Kuwait,
            "LK" => SriLanka,
            "MU" => Mauritius,
            "MV" => Maldives,
            "MX" => Mexico,
            "MY" => Malaysia,
            "NG" => Nigeria,
            "NL" => Netherlands,
            "NO" => Norway,
            "NP" => Nepal,
            "NZ" => NewZealand,
            "OM" => Oman,
            "PH" => Philippines,
            "PK" => Pakistan,
            "PL" => Poland,
            "PT" => Portugal,
            "QA" => Qatar,
            "RU" => Russia,
            "SA" => SaudiArabia,
            "SE" => Sweden,
            "SG" => Singapore,
            "TH" => Thailand,
            "TR" => Turkey,
            "TW" => Taiwan,
            "TZ" => Tanzania,
            "UG" => Uganda,
            "US" => UnitedStates,
            "VN" => Vietnam,
            "ZA" => SouthAfrica,
            _ => return None,
        };
        Some(country)
    }

    pub fn name(&self) -> &'static str {
        use Country::*;
        match self {
            UnitedArabEmirates => "United Arab Emirates",
            Afghanistan => "Afghanistan",
            Argentina => "Argentina",
            Austria => "Austria",
            Australia => "Australia",
            Bangladesh => "Bangladesh",
            Belgium => "Belgium",
            Bahrain => "Bahrain",
            Brazil => "Brazil",
            Bhutan => "Bhutan",
            Canada => "Canada",
            Switzerland => "Switzerland",
            China => "China",
            Germany => "Germany",
            Denmark => "Denmark",
            Egypt => "Egypt",
            Spain => "Spain",
            Finland => "Finland",
            France => "France",
            UnitedKingdom => "United Kingdom",
            HongKong => "Hong Kong",
            Indonesia => "Indonesia",
            Ireland => "Ireland",
            Israel => "Israel",
            India => "India",
            Italy => "Italy",
            Japan => "Japan",
            Kenya => "Kenya",
            SouthKorea => "Korea, Republic of",
            Kuwait => "Kuwait",
            SriLanka => "Sri Lanka",
            Mauritius => "Mauritius",
            Maldives => "Maldives",
            Mexico => "Mexico",
            Malaysia => "Malaysia",
            Nigeria => "Nigeria",
            Netherlands => "Netherlands",
            Norway => "Norway",
            Nepal => "Nepal",
            NewZealand => "New Zealand",
            Oman => "Oman",
            Philippines => "Philippines",
            Pakistan => "Pakistan",
            Poland => "Poland",
            Portugal => "Portugal",
            Qatar => "Qatar",
            Russia => "Russian Federation",
            SaudiArabia => "Saudi Arabia",
            Sweden => "Sweden",
            Singapore => "Singapore",
            Thailand => "Thailand",
            Turkey => "Turkey",
            Taiwan => "Taiwan",
            Tanzania => "Tanzania",
            Uganda => "Uganda",
            UnitedStates => "United States",
            Vietnam => "Vietnam",
            SouthAfrica => "South Africa",
        }
    }

    pub fn code(&self) -> &'static str {
        use Country::*;
        match self {
            UnitedArabEmirates => "AE",
            Afghanistan => "AF",
            Argentina => "AR",
            Austria => "AT",
            Australia => "AU",
            Bangladesh => "BD",
            Belgium => "BE",
            Bahrain => "BH",
            Brazil => "BR",
            Bhutan => "BT",
            Canada => "CA",
            Switzerland => "CH",
            China => "CN",
            Germany => "DE",
            Denmark => "DK",
            Egypt => "EG",
            Spain => "ES",
            Finland => "FI",
            France => "FR",
            UnitedKingdom => "GB",
            HongKong => "HK",
            Indonesia => "ID",
            Ireland => "IE",
            Israel => "IL",
            India => "IN",
            Italy => "IT",
            Japan => "JP",
            Kenya => "KE",
            SouthKorea => "KR",
            Kuwait => "KW",
            SriLanka => "LK",
            Mauritius => "MU",
            Maldives => "MV",
            Mexico => "MX",
            Malaysia => "MY",
            Nigeria => "NG",
            Netherlands => "NL",
            Norway => "NO",
            Nepal => "NP",
            NewZealand => "NZ",
            Oman => "OM",
            Philippines => "PH",
            Pakistan => "PK",
            Poland => "PL",
            Portugal => "PT",
            Qatar => "QA",
            Russia => "RU",
            SaudiArabia => "SA",
            Sweden => "SE",
            Singapore => "SG",
            Thailand => "TH",
            Turkey => "TR",
            Taiwan => "TW",
            Tanzania => "TZ",
            Uganda => "UG",
            UnitedStates => "US",
            Vietnam => "VN",
            SouthAfrica => "ZA",
        }
    }
}
