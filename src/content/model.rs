use crate::{
    foundation::error::{UndanganError, UndanganResult},
    scene::motion::MotionConfig,
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Everything the invitation page is templated from.
///
/// Loaded from JSON by the host (or the `undangan` binary); the reveal core only ever sees
/// the resolved strings and URLs.
pub struct SiteData {
    /// Hero banner content.
    pub hero: HeroContent,
    /// Couple, reception and gift details.
    pub wedding: Wedding,
    /// Animation timing; defaults apply when absent.
    #[serde(default)]
    pub motion: MotionConfig,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Hero section media.
pub struct HeroContent {
    /// Banner image URL.
    pub banner: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Wedding details.
pub struct Wedding {
    /// The two people getting married.
    pub couple: Couple,
    /// Reception event.
    pub reception: Reception,
    /// Digital gift transfer details.
    pub digital_envelope: DigitalEnvelope,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Groom and bride.
pub struct Couple {
    /// Groom profile.
    pub groom: Person,
    /// Bride profile.
    pub bride: Person,
}

impl Couple {
    /// Hero headline: groom's first name and bride's nickname.
    pub fn headline(&self) -> String {
        format!("{} & {}", self.groom.first_name, self.bride.nickname)
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One partner's profile.
pub struct Person {
    /// Given name.
    pub first_name: String,
    /// Family name (may be empty).
    #[serde(default)]
    pub last_name: String,
    /// Short name used in the hero headline.
    pub nickname: String,
    /// Portrait URL.
    pub photo: String,
    /// Section background colour (CSS value).
    #[serde(default)]
    pub background: Option<String>,
    /// Parents line.
    pub parents: Parents,
}

impl Person {
    /// First and last name joined by a space.
    pub fn full_name(&self) -> String {
        let last = self.last_name.trim();
        if last.is_empty() {
            self.first_name.trim().to_owned()
        } else {
            format!("{} {}", self.first_name.trim(), last)
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Parents of one partner.
pub struct Parents {
    /// Father's name.
    pub father: String,
    /// Mother's name.
    pub mother: String,
    /// Relationship line, e.g. "Putra pertama dari".
    pub caption: String,
}

impl Parents {
    /// Formal line naming both parents.
    pub fn formal_line(&self) -> String {
        format!("Bpk. {} & Ibu. {}", self.father, self.mother)
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Reception event details.
pub struct Reception {
    /// Human-readable date line.
    pub date: String,
    /// Time range.
    pub time: String,
    /// Venue name.
    pub venue: String,
    /// Street address.
    pub address: String,
    /// Map link.
    pub maps_link: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Bank transfer details for the digital envelope.
pub struct DigitalEnvelope {
    /// Bank name.
    pub bank_name: String,
    /// Account holder.
    pub account_holder: String,
    /// Account number, copied verbatim.
    pub account_number: String,
    /// Address for physical gifts.
    pub shipping_address: String,
    /// Logo URL.
    #[serde(default)]
    pub bank_logo: Option<String>,
    /// WhatsApp confirmation target, if offered.
    #[serde(default)]
    pub whatsapp: Option<WhatsAppConfirmation>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Pre-filled WhatsApp message sent to confirm a transfer.
pub struct WhatsAppConfirmation {
    /// International number without `+` or separators.
    pub phone: String,
    /// Message text.
    pub message: String,
}

fn require(value: &str, field: &str) -> UndanganResult<()> {
    if value.trim().is_empty() {
        return Err(UndanganError::validation(format!("{field} must be non-empty")));
    }
    Ok(())
}

impl SiteData {
    /// Parse and validate a JSON document.
    pub fn from_json(s: &str) -> UndanganResult<Self> {
        let data: Self = serde_json::from_str(s)?;
        data.validate()?;
        Ok(data)
    }

    /// Check required content and the motion configuration.
    pub fn validate(&self) -> UndanganResult<()> {
        require(&self.hero.banner, "hero.banner")?;

        for (who, person) in [
            ("groom", &self.wedding.couple.groom),
            ("bride", &self.wedding.couple.bride),
        ] {
            require(&person.first_name, &format!("wedding.couple.{who}.firstName"))?;
            require(&person.nickname, &format!("wedding.couple.{who}.nickname"))?;
            require(&person.photo, &format!("wedding.couple.{who}.photo"))?;
        }

        require(&self.wedding.reception.date, "wedding.reception.date")?;

        let envelope = &self.wedding.digital_envelope;
        require(&envelope.bank_name, "wedding.digitalEnvelope.bankName")?;
        require(&envelope.account_number, "wedding.digitalEnvelope.accountNumber")?;
        if let Some(wa) = &envelope.whatsapp
            && (wa.phone.is_empty() || !wa.phone.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(UndanganError::validation(
                "wedding.digitalEnvelope.whatsapp.phone must contain digits only",
            ));
        }

        self.motion.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/model.rs"]
mod tests;
