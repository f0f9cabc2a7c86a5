use super::MessageKey as K;

pub(super) const MESSAGES: &[(K, &str)] = &[
    (K::SendingSms, "SMS message is being sent..."),
    (K::SmsSent, "SMS message has been sent."),
    (
        K::SmsSentFrom,
        "Code has been sent! You will receive a message from number %number%.",
    ),
    (K::VerifyingToken, "Code is being verified..."),
    (K::IssuingCredential, "Attribute is being issued..."),
    (K::ButtonPhone, "Add"),
    (K::ButtonConfirm, "Confirm"),
    (K::ButtonToken, "Verify"),
    (K::Second, "%n% second"),
    (K::Seconds, "%n% seconds"),
    (K::Minute, "%n% minute"),
    (K::Minutes, "%n% minutes"),
    (K::Hour, "%n% hour"),
    (K::Hours, "%n% hours"),
    (K::RetryLater, "a moment"),
    (K::PhoneAddSuccess, "Phone number attribute has been added."),
    (
        K::PhoneAddTimeout,
        "The session timed out. Please reload this page and try again.",
    ),
    (K::PhoneAddCancel, "Cancelled."),
    (
        K::PhoneAddError,
        "Adding the phone number attribute failed, unfortunately.",
    ),
    (
        K::ErrorPhoneNumberFormat,
        "You did not enter a valid telephone number. Please check whether the telephone number is correct.",
    ),
    (
        K::ErrorInternal,
        "Internal error. Please contact Yivi if this happens more often.",
    ),
    (
        K::ErrorSendingSms,
        "Sending the SMS message fails. Most likely this is a problem in the Yivi system. Please contact Yivi if this happens more often.",
    ),
    (K::ErrorRatelimit, "Please try again in %time%."),
    (
        K::ErrorCannotValidateToken,
        "The code cannot be verified. Is there a typo?",
    ),
    (
        K::ErrorAddressMalformed,
        "The telephone number you entered is not supported by us. You can only add (European) mobile telephone numbers.",
    ),
];
