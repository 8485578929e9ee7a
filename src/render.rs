use std::io::{self, Write};

use crate::webauthn::{AssertionDetails, CredentialDetails};

/// Uppercase, two digits per byte, no separators.
pub fn hex_upper(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

fn text(s: &Option<String>) -> &str {
    s.as_deref().unwrap_or("")
}

pub fn api_version<W: Write>(out: &mut W, version: u32) -> io::Result<()> {
    writeln!(out, "Windows WebAuthn API version: {version}")
}

pub fn credential_list<W: Write>(out: &mut W, creds: &[CredentialDetails<'_>]) -> io::Result<()> {
    writeln!(out, "Credentials ({}):", creds.len())?;
    writeln!(out)?;
    for (index, cred) in creds.iter().enumerate() {
        credential(out, index, cred)?;
    }
    Ok(())
}

pub fn credential<W: Write>(
    out: &mut W,
    index: usize,
    cred: &CredentialDetails<'_>,
) -> io::Result<()> {
    writeln!(out, "Index: {index}")?;
    writeln!(out, "ID: {}", hex_upper(cred.credential_id))?;

    writeln!(out, "Relying Party information:")?;
    writeln!(out, "  ID:   {}", text(&cred.rp.id))?;
    writeln!(out, "  Name: {}", text(&cred.rp.name))?;
    writeln!(out, "  Icon: {}", text(&cred.rp.icon))?;

    writeln!(out, "User information:")?;
    writeln!(out, "  ID:   {}", hex_upper(cred.user.id))?;
    writeln!(out, "  Name:         {}", text(&cred.user.name))?;
    writeln!(out, "  Display name: {}", text(&cred.user.display_name))?;
    writeln!(out, "  Icon:         {}", text(&cred.user.icon))?;

    writeln!(out, "Removable: {}", u8::from(cred.removable))?;
    writeln!(out, "Backed up: {}", u8::from(cred.backed_up))?;
    writeln!(out)
}

pub fn assertion<W: Write>(out: &mut W, a: &AssertionDetails<'_>) -> io::Result<()> {
    writeln!(out, "Assertion result:")?;
    writeln!(out, "Authenticator data: {}", hex_upper(a.authenticator_data))?;
    writeln!(out, "Signature: {}", hex_upper(a.signature))?;
    writeln!(out, "Credential:")?;
    writeln!(out, "  ID:   {}", hex_upper(a.credential_id))?;
    writeln!(out, "  Type: {}", text(&a.credential_type))?;
    writeln!(out, "User ID: {}", hex_upper(a.user_id))?;
    writeln!(out, "Large blob: {}", hex_upper(a.large_blob))?;
    writeln!(out, "Large blob status: {}", a.large_blob_status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webauthn::{RpEntity, UserEntity};
    use proptest::prelude::*;

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_hex_upper_layout() {
        assert_eq!(hex_upper(&[]), "");
        assert_eq!(hex_upper(&[0x00, 0x0f, 0xab, 0xff]), "000FABFF");
    }

    proptest! {
        #[test]
        fn prop_hex_upper_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
            let first = hex_upper(&bytes);
            prop_assert_eq!(&first, &hex_upper(&bytes));
            prop_assert_eq!(first.len(), bytes.len() * 2);
            prop_assert!(first.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
            prop_assert_eq!(hex::decode(&first).unwrap(), bytes);
        }
    }

    #[test]
    fn test_credential_block() {
        let cred = CredentialDetails {
            credential_id: &[0x01, 0xAB],
            rp: RpEntity {
                id: Some("example.com".into()),
                name: Some("Example".into()),
                icon: None,
            },
            user: UserEntity {
                id: &[0xFE],
                name: Some("alice".into()),
                display_name: Some("Alice".into()),
                icon: None,
            },
            removable: true,
            backed_up: false,
        };
        let out = render(|w| credential(w, 3, &cred));
        let expected = [
            "Index: 3",
            "ID: 01AB",
            "Relying Party information:",
            "  ID:   example.com",
            "  Name: Example",
            "  Icon: ",
            "User information:",
            "  ID:   FE",
            "  Name:         alice",
            "  Display name: Alice",
            "  Icon:         ",
            "Removable: 1",
            "Backed up: 0",
            "",
            "",
        ]
        .join("\n");
        assert_eq!(out, expected);
    }

    #[test]
    fn test_assertion_block() {
        let a = AssertionDetails {
            authenticator_data: &[0xAA; 2],
            signature: &[0x30, 0x45],
            credential_id: &[0x01],
            credential_type: Some("public-key".into()),
            user_id: &[0x75],
            large_blob: &[],
            large_blob_status: 2,
        };
        let out = render(|w| assertion(w, &a));
        assert_eq!(
            out,
            "Assertion result:\n\
             Authenticator data: AAAA\n\
             Signature: 3045\n\
             Credential:\n  ID:   01\n  Type: public-key\n\
             User ID: 75\n\
             Large blob: \n\
             Large blob status: 2\n"
        );
    }

    #[test]
    fn test_empty_list_header() {
        let out = render(|w| credential_list(w, &[]));
        assert_eq!(out, "Credentials (0):\n\n");
    }
}
