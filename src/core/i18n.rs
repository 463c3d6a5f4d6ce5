//! Box labels for the languages HMRC publishes the VAT return in

use super::boxes::BoxKey;
use super::record::ParseError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    /// Welsh
    Cy,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Cy => "cy",
        }
    }
}

impl FromStr for Language {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "cy" => Ok(Language::Cy),
            _ => Err(ParseError {
                kind: "language",
                value: s.to_string(),
                expected: "en, cy",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxLabel {
    pub name: &'static str,
    pub description: &'static str,
}

const EN: [BoxLabel; 9] = [
    BoxLabel {
        name: "VAT due on sales",
        description: "VAT due in the period on sales and other outputs",
    },
    BoxLabel {
        name: "VAT due on EU acquisitions",
        description: "VAT due in the period on acquisitions of goods made in Northern Ireland from EU Member States",
    },
    BoxLabel {
        name: "Total VAT due",
        description: "Total VAT due (the sum of boxes 1 and 2)",
    },
    BoxLabel {
        name: "VAT reclaimed on purchases",
        description: "VAT reclaimed in the period on purchases and other inputs (including acquisitions from the EU)",
    },
    BoxLabel {
        name: "Net VAT to pay or reclaim",
        description: "Net VAT to pay to HMRC or reclaim (the difference between boxes 3 and 4)",
    },
    BoxLabel {
        name: "Total sales excluding VAT",
        description: "Total value of sales and all other outputs excluding any VAT",
    },
    BoxLabel {
        name: "Total purchases excluding VAT",
        description: "Total value of purchases and all other inputs excluding any VAT",
    },
    BoxLabel {
        name: "Total supplies to the EU",
        description: "Total value of dispatches of goods and related costs (excluding VAT) from Northern Ireland to EU Member States",
    },
    BoxLabel {
        name: "Total acquisitions from the EU",
        description: "Total value of acquisitions of goods and related costs (excluding VAT) made in Northern Ireland from EU Member States",
    },
];

const CY: [BoxLabel; 9] = [
    BoxLabel {
        name: "TAW sy'n ddyledus ar werthiannau",
        description: "TAW sy'n ddyledus yn y cyfnod ar werthiannau ac allbynnau eraill",
    },
    BoxLabel {
        name: "TAW sy'n ddyledus ar gaffaeliadau o'r UE",
        description: "TAW sy'n ddyledus yn y cyfnod ar gaffaeliadau o nwyddau a wnaed yng Ngogledd Iwerddon o Aelod-wladwriaethau'r UE",
    },
    BoxLabel {
        name: "Cyfanswm y TAW sy'n ddyledus",
        description: "Cyfanswm y TAW sy'n ddyledus (swm blychau 1 a 2)",
    },
    BoxLabel {
        name: "TAW a adenillwyd ar bryniannau",
        description: "TAW a adenillwyd yn y cyfnod ar bryniannau a mewnbynnau eraill (gan gynnwys caffaeliadau o'r UE)",
    },
    BoxLabel {
        name: "TAW net i'w thalu neu i'w hadennill",
        description: "TAW net i'w thalu i CThEF neu i'w hadennill (y gwahaniaeth rhwng blychau 3 a 4)",
    },
    BoxLabel {
        name: "Cyfanswm gwerthiannau heb TAW",
        description: "Cyfanswm gwerth gwerthiannau a phob allbwn arall, heb gynnwys unrhyw TAW",
    },
    BoxLabel {
        name: "Cyfanswm pryniannau heb TAW",
        description: "Cyfanswm gwerth pryniannau a phob mewnbwn arall, heb gynnwys unrhyw TAW",
    },
    BoxLabel {
        name: "Cyfanswm cyflenwadau i'r UE",
        description: "Cyfanswm gwerth nwyddau a anfonwyd a chostau cysylltiedig (heb gynnwys TAW) o Ogledd Iwerddon i Aelod-wladwriaethau'r UE",
    },
    BoxLabel {
        name: "Cyfanswm caffaeliadau o'r UE",
        description: "Cyfanswm gwerth caffaeliadau o nwyddau a chostau cysylltiedig (heb gynnwys TAW) a wnaed yng Ngogledd Iwerddon o Aelod-wladwriaethau'r UE",
    },
];

pub fn box_label(key: BoxKey, language: Language) -> BoxLabel {
    let table = match language {
        Language::En => &EN,
        Language::Cy => &CY,
    };
    table[usize::from(key.number() - 1)]
}
