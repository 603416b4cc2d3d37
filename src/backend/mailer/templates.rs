//! Email templates

use super::OutgoingEmail;

pub fn otp_email(to: &str, first_name: &str, otp: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: "OTP for ChitChat".to_string(),
        text: format!(
            "Hi {first_name},\n\nYour OTP is {otp}\n\nIt expires in 10 minutes."
        ),
        html: format!(
            "<p>Hi {first_name},</p><h1>{otp}</h1><p>This code expires in 10 minutes.</p>"
        ),
    }
}

pub fn reset_password_email(to: &str, first_name: &str, reset_url: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: "Reset your ChitChat password".to_string(),
        text: format!(
            "Hi {first_name},\n\nUse the link below to choose a new password. \
             It is valid for 10 minutes.\n\n{reset_url}\n\n\
             If you did not ask for a reset you can ignore this email."
        ),
        html: format!(
            "<p>Hi {first_name},</p>\
             <p>Click the button below to choose a new password. It is valid for 10 minutes.</p>\
             <p><a href=\"{reset_url}\">Reset password</a></p>\
             <p>If you did not ask for a reset you can ignore this email.</p>"
        ),
    }
}
