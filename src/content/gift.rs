use crate::content::model::{DigitalEnvelope, Reception, WhatsAppConfirmation};

/// Message shown after the account number is copied.
pub const COPY_CONFIRMATION: &str = "Nomor rekening berhasil disalin!";

/// `https://wa.me/` deep link with a pre-filled, percent-encoded message.
pub fn whatsapp_link(phone: &str, message: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        phone.trim(),
        urlencoding::encode(message)
    )
}

/// Resolved digital-envelope card.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct GiftCard {
    /// Card title.
    pub title: String,
    /// "Bank: ..." line.
    pub bank: String,
    /// "Atas Nama: ..." line.
    pub holder: String,
    /// Raw account number; this is what the copy button puts on the clipboard.
    pub account_number: String,
    /// "Alamat Pengiriman: ..." line.
    pub shipping_address: String,
    /// Bank logo URL.
    pub logo: Option<String>,
    /// Confirmation text shown after copying.
    pub copy_confirmation: String,
    /// WhatsApp confirmation link.
    pub whatsapp_link: Option<String>,
}

impl GiftCard {
    /// Resolve the card from envelope data.
    pub fn new(envelope: &DigitalEnvelope) -> Self {
        Self {
            title: "Amplop Digital".to_owned(),
            bank: format!("Bank: {}", envelope.bank_name),
            holder: format!("Atas Nama: {}", envelope.account_holder),
            account_number: envelope.account_number.trim().to_owned(),
            shipping_address: format!("Alamat Pengiriman: {}", envelope.shipping_address),
            logo: envelope.bank_logo.clone(),
            copy_confirmation: COPY_CONFIRMATION.to_owned(),
            whatsapp_link: envelope
                .whatsapp
                .as_ref()
                .map(|WhatsAppConfirmation { phone, message }| whatsapp_link(phone, message)),
        }
    }
}

/// Resolved reception card.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ReceptionCard {
    /// Card title.
    pub title: String,
    /// Date line.
    pub date: String,
    /// Time line.
    pub time: String,
    /// Venue name.
    pub venue: String,
    /// Street address.
    pub address: String,
    /// Map link.
    pub maps_link: String,
}

impl ReceptionCard {
    /// Resolve the card from reception data.
    pub fn new(reception: &Reception) -> Self {
        Self {
            title: "Resepsi Nikah".to_owned(),
            date: reception.date.clone(),
            time: reception.time.clone(),
            venue: reception.venue.clone(),
            address: reception.address.clone(),
            maps_link: reception.maps_link.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/gift.rs"]
mod tests;
