/// Indian states and union territories, keyed by the two-letter codes Unicommerce uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndianState {
    AndamanAndNicobarIslands,
    AndhraPradesh,
    ArunachalPradesh,
    Assam,
    Bihar,
    Chandigarh,
    Chhattisgarh,
    DadraAndNagarHaveliAndDamanAndDiu,
    Delhi,
    Goa,
    Gujarat,
    Haryana,
    HimachalPradesh,
    JammuAndKashmir,
    Jharkhand,
    Karnataka,
    Kerala,
    Ladakh,
    Lakshadweep,
    MadhyaPradesh,
    Maharashtra,
    Manipur,
    Meghalaya,
    Mizoram,
    Nagaland,
    Odisha,
    Puducherry,
    Punjab,
    Rajasthan,
    Sikkim,
    TamilNadu,
    Telangana,
    Tripura,
    UttarPradesh,
    Uttarakhand,
    WestBengal,
}

impl IndianState {
    pub fn from_code(code: &str) -> Option<Self> {
        use IndianState::*;
        let state = match code {
            "AN" => AndamanAndNicobarIslands,
            "AP" => AndhraPradesh,
            "AR" => ArunachalPradesh,
            "AS" => Assam,
            "BR" => Bihar,
            "CH" => Chandigarh,
            "CT" | "CG" => Chhattisgarh,
            "DN" | "DD" => DadraAndNagarHaveliAndDamanAndDiu,
            "DL" => Delhi,
            "GA" => Goa,
            "GJ" => Gujarat,
            "HR" => Haryana,
            "HP" => HimachalPradesh,
            "JK" => JammuAndKashmir,
            "JH" => Jharkhand,
            "KA" => Karnataka,
            "KL" => Kerala,
            "LA" => Ladakh,
            "LD" => Lakshadweep,
            "MP" => MadhyaPradesh,
            "MH" => Maharashtra,
            "MN" => Manipur,
            "ML" => Meghalaya,
            "MZ" => Mizoram,
            "NL" => Nagaland,
            "OR" | "OD" => Odisha,
            "PY" => Puducherry,
            "PB" => Punjab,
            "RJ" => Rajasthan,
            "SK" => Sikkim,
            "TN" => TamilNadu,
            "TG" | "TS" => Telangana,
            "TR" => Tripura,
            "UP" => UttarPradesh,
            "UT" | "UK" => Uttarakhand,
            "WB" => WestBengal,
            _ => return None,
        };
        Some(state)
    }

    pub fn name(&self) -> &'static str {
        use IndianState::*;
        match self {
            AndamanAndNicobarIslands => "Andaman and Nicobar Islands",
            AndhraPradesh => "Andhra Pradesh",
            ArunachalPradesh => "Arunachal Pradesh",
            Assam => "Assam",
            Bihar => "Bihar",
            Chandigarh => "Chandigarh",
            Chhattisgarh => "Chhattisgarh",
            DadraAndNagarHaveliAndDamanAndDiu => "Dadra and Nagar Haveli and Daman and Diu",
            Delhi => "Delhi",
            Goa => "Goa",
            Gujarat => "Gujarat",
            Haryana => "Haryana",
            HimachalPradesh => "Himachal Pradesh",
            JammuAndKashmir => "Jammu and Kashmir",
            Jharkhand => "Jharkhand",
            Karnataka => "Karnataka",
            Kerala => "Kerala",
            Ladakh => "Ladakh",
            Lakshadweep => "Lakshadweep Islands",
            MadhyaPradesh => "Madhya Pradesh",
            Maharashtra => "Maharashtra",
            Manipur => "Manipur",
            Meghalaya => "Meghalaya",
            Mizoram => "Mizoram",
            Nagaland => "Nagaland",
            Odisha => "Odisha",
            Puducherry => "Pondicherry",
            Punjab => "Punjab",
            Rajasthan => "Rajasthan",
            Sikkim => "Sikkim",
            TamilNadu => "Tamil Nadu",
            Telangana => "Telangana",
            Tripura => "Tripura",
            UttarPradesh => "Uttar Pradesh",
            Uttarakhand => "Uttarakhand",
            WestBengal => "West Bengal",
        }
    }
}
