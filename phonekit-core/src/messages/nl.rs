use super::MessageKey as K;

pub(super) const MESSAGES: &[(K, &str)] = &[
    (K::SendingSms, "SMS-bericht wordt verstuurd..."),
    (K::SmsSent, "SMS-bericht is verstuurd."),
    (
        K::SmsSentFrom,
        "Code is verstuurd! U krijgt een bericht van nummer %number%.",
    ),
    (K::VerifyingToken, "Code wordt geverifieerd..."),
    (K::IssuingCredential, "Attribuut uitgeven..."),
    (K::ButtonPhone, "Voeg toe"),
    (K::ButtonConfirm, "Bevestig"),
    (K::ButtonToken, "Verifieer"),
    (K::Second, "%n% seconde"),
    (K::Seconds, "%n% seconden"),
    (K::Minute, "%n% minuut"),
    (K::Minutes, "%n% minuten"),
    (K::Hour, "%n% uur"),
    (K::Hours, "%n% uur"),
    (K::RetryLater, "een moment"),
    (K::PhoneAddSuccess, "Telefoonnummer toegevoegd."),
    (
        K::PhoneAddTimeout,
        "De sessie is verlopen. Herlaad de pagina om het opnieuw te proberen.",
    ),
    (K::PhoneAddCancel, "Geannuleerd."),
    (
        K::PhoneAddError,
        "Het is helaas niet gelukt dit telefoonnummer toe te voegen aan de Yivi-app.",
    ),
    (
        K::ErrorPhoneNumberFormat,
        "Je hebt geen geldig telefoonnummer ingevoerd. Controleer of het ingevoerde telefoonnummer klopt.",
    ),
    (
        K::ErrorInternal,
        "Interne fout. Neem contact op met Yivi als dit vaker voorkomt.",
    ),
    (
        K::ErrorSendingSms,
        "De SMS kan niet worden verzonden. Dit is waarschijnlijk een probleem in Yivi. Neem contact op met Yivi als dit vaker voorkomt.",
    ),
    (K::ErrorRatelimit, "Probeer het opnieuw over %time%."),
    (
        K::ErrorCannotValidateToken,
        "De code kon niet worden geverifieerd. Zit er geen typfout in?",
    ),
    (
        K::ErrorAddressMalformed,
        "Het ingevoerde telefoonnummer wordt niet ondersteund. Je kan alleen mobiele telefoonnummers toevoegen.",
    ),
];
