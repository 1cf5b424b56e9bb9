use serde::Serialize;
use woothee::parser::Parser;

/// Family reported when the classifier does not recognise a browser or OS.
pub const UNKNOWN_FAMILY: &str = "Other";

/// Raw answer of a user-agent classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UaTraits {
    pub browser_family: String,
    pub os_family: String,
    pub is_mobile: bool,
    pub is_tablet: bool,
}

/// External user-agent grammar. Implementations must accept any input.
pub trait UaClassifier {
    fn traits(&self, ua: &str) -> UaTraits;
}

pub struct WootheeClassifier {
    parser: Parser,
}

impl WootheeClassifier {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }
}

impl Default for WootheeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn family(value: &str) -> String {
    if value.is_empty() || value == "UNKNOWN" {
        UNKNOWN_FAMILY.to_string()
    } else {
        value.to_string()
    }
}

impl UaClassifier for WootheeClassifier {
    fn traits(&self, ua: &str) -> UaTraits {
        let Some(result) = self.parser.parse(ua) else {
            return UaTraits {
                browser_family: UNKNOWN_FAMILY.to_string(),
                os_family: UNKNOWN_FAMILY.to_string(),
                is_mobile: false,
                is_tablet: false,
            };
        };

        // woothee has no tablet category: iPads and Android devices without
        // a `Mobile` token come back as smartphones
        let is_tablet = result.os == "iPad" || (result.os == "Android" && !ua.contains("Mobile"));
        let is_mobile = !is_tablet && matches!(result.category, "smartphone" | "mobilephone");

        UaTraits {
            browser_family: family(result.name),
            os_family: family(result.os),
            is_mobile,
            is_tablet,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    /// Mobile wins over tablet when a classifier reports both.
    pub fn from_flags(is_mobile: bool, is_tablet: bool) -> Self {
        if is_mobile {
            DeviceClass::Mobile
        } else if is_tablet {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => "Mobile",
            DeviceClass::Tablet => "Tablet",
            DeviceClass::Desktop => "Desktop",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentInfo {
    pub browser: String,
    pub os: String,
    pub device: DeviceClass,
}

pub fn classify(classifier: &dyn UaClassifier, ua: &str) -> UserAgentInfo {
    let traits = classifier.traits(ua);
    UserAgentInfo {
        browser: traits.browser_family,
        os: traits.os_family,
        device: DeviceClass::from_flags(traits.is_mobile, traits.is_tablet),
    }
}
