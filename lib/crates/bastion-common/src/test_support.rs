//! Shared fixtures for unit tests.

use crate::keygen::EncodedPublicKey;

/// A real 2048-bit RSA public key; its private half was discarded.
pub const RSA_2048_LINE: &str = "ssh-rsa AAAAB3NzaC1yc2EAAAADAQABAAABAQCozsAuiA4pmkg4t1yAKfQ3ynqveBE7FmDVaDEd3bkB3oNpCqBwOaUlxAFY6iiq5tkOarNm/bRGv2plxsslLvoRPvA4BIQpKClqmCXTWWAEVI9wk70YhywP4HueOvjZaKzqNTtq1gj5BJZPE5sknMGs8cvSorx0CKt5tPThm8Y8ID8jmHqbh1mJKcqV8bVWTedajk2fsuJirYxqmdd80zTv0OasyM80Asq+jb6cdQX2I73fICcwiqalFl7xs76NRZvYjTrjZhzRloKRp1xvL7l9cK+MlJTFEidPEHX3S+Xtdic0b0TWQyQOoEihub0mg2MVkF8kgaMbxzUsAX/5hW57";

/// A 1024-bit RSA public key, below the accepted minimum.
pub const RSA_1024_LINE: &str = "ssh-rsa AAAAB3NzaC1yc2EAAAADAQABAAAAgQC6I1T9UCwvgFOnXajHeTK+1LBe88K749aq6xMUuVS4hx0CZD4mtnvKI83lpA2wx2SEi6G5HVpVaBiZfBXK889+OQvzGC/tu4mX4JRJmryjtK1IUBUppA2liCSeiqdL5Vu8gy8IA2a/5GIR+mxWeO618VXQyfodWM2ekTVKe1x4mw==";

#[allow(clippy::expect_used)]
pub fn fixture_key() -> EncodedPublicKey {
    RSA_2048_LINE.parse().expect("fixture key parses")
}
