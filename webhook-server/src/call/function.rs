//! The closed set of functions the voice agent may invoke.

use std::fmt;

/// A recognized webhook function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// Transcript order: customer confirmation plus admin alert
    SubmitVideoplusOrder,
    /// Email the website link to the caller
    SendWebsiteLink,
    /// Forward a support request to the admin
    SendSupportTicket,
    /// Caller is hanging up
    EndCall,
}

impl Function {
    #[cfg(test)]
    pub const ALL: [Function; 4] = [
        Function::SubmitVideoplusOrder,
        Function::SendWebsiteLink,
        Function::SendSupportTicket,
        Function::EndCall,
    ];

    /// Look up a function by its wire name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "submit_videoplus_order" => Some(Function::SubmitVideoplusOrder),
            "send_website_link" => Some(Function::SendWebsiteLink),
            "send_support_ticket" => Some(Function::SendSupportTicket),
            "end_call" => Some(Function::EndCall),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Function::SubmitVideoplusOrder => "submit_videoplus_order",
            Function::SendWebsiteLink => "send_website_link",
            Function::SendSupportTicket => "send_support_ticket",
            Function::EndCall => "end_call",
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
