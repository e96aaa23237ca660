//! detect-secrets plugins and the secret types they report.
//!
//! Baselines name plugins by class (`AWSKeyDetector`) in `plugins_used`, but
//! tag findings with the plugin's secret type (`AWS Access Key`). The table
//! maps between the two.

/// `(plugin class name, secret type)` for every supported plugin.
pub const PLUGINS: [(&str, &str); 16] = [
    ("ArtifactoryDetector", "Artifactory Credentials"),
    ("AWSKeyDetector", "AWS Access Key"),
    ("Base64HighEntropyString", "Base64 High Entropy String"),
    ("BasicAuthDetector", "Basic Auth Credentials"),
    ("CloudantDetector", "Cloudant Credentials"),
    ("HexHighEntropyString", "Hex High Entropy String"),
    ("IbmCloudIamDetector", "IBM Cloud IAM Key"),
    ("IbmCosHmacDetector", "IBM COS HMAC Credentials"),
    ("JwtTokenDetector", "JSON Web Token"),
    ("KeywordDetector", "Secret Keyword"),
    ("MailchimpDetector", "Mailchimp Access Key"),
    ("PrivateKeyDetector", "Private Key"),
    ("SlackDetector", "Slack Token"),
    ("SoftlayerDetector", "SoftLayer Credentials"),
    ("StripeDetector", "Stripe Access Key"),
    ("TwilioKeyDetector", "Twilio API Key"),
];

/// Secret type reported by plugin `name`.
#[must_use]
pub fn secret_type(name: &str) -> Option<&'static str> {
    PLUGINS
        .iter()
        .find(|(plugin, _)| *plugin == name)
        .map(|(_, secret)| *secret)
}

/// Plugin reporting `secret_type`.
#[must_use]
pub fn plugin_for(secret_type: &str) -> Option<&'static str> {
    PLUGINS
        .iter()
        .find(|(_, secret)| *secret == secret_type)
        .map(|(plugin, _)| *plugin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups() {
        assert_eq!(secret_type("AWSKeyDetector"), Some("AWS Access Key"));
        assert_eq!(plugin_for("Secret Keyword"), Some("KeywordDetector"));
        assert_eq!(secret_type("GitHubTokenDetector"), None);
        assert_eq!(plugin_for("aws access key"), None);
    }

    #[test]
    fn test_table_is_a_bijection() {
        for (plugin, secret) in PLUGINS {
            assert_eq!(plugin_for(secret), Some(plugin));
            assert_eq!(secret_type(plugin), Some(secret));
        }
    }
}
