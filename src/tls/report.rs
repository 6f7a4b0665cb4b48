// SPDX-License-Identifier: Apache-2.0

//! Decode a PEM certificate into the fields printed by `tlsinfo`

use crate::error::{BusyboxError, Result};
use chrono::{DateTime, TimeZone, Utc};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::*;

const PEM_CERTIFICATE_LABEL: &str = "CERTIFICATE";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z UTC";

/// Attribute types printed by short name, in the order a name is rebuilt from them
const CANONICAL_ATTRIBUTES: &[(&str, &str)] = &[
    ("2.5.4.6", "C"),
    ("2.5.4.8", "ST"),
    ("2.5.4.7", "L"),
    ("2.5.4.9", "STREET"),
    ("2.5.4.17", "POSTALCODE"),
    ("2.5.4.10", "O"),
    ("2.5.4.11", "OU"),
    ("2.5.4.3", "CN"),
    ("2.5.4.5", "SERIALNUMBER"),
];

/// Only the last value of these is kept
const SINGLE_VALUED: &[&str] = &["2.5.4.3", "2.5.4.5"];

const TAG_UTF8_STRING: u8 = 0x0c;
const TAG_PRINTABLE_STRING: u8 = 0x13;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateSummary {
    pub subject: String,
    pub issuer_common_name: String,
    pub subject_common_name: String,
    pub dns_names: Vec<String>,
    pub email_addresses: Vec<String>,
    pub ip_addresses: Vec<String>,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

impl CertificateSummary {
    /// Decode the first PEM block and summarize the certificate inside it
    pub fn from_pem(bytes: &[u8]) -> Result<Self> {
        let (_, pem) =
            parse_x509_pem(bytes).map_err(|e| BusyboxError::PemError(e.to_string()))?;

        if pem.label != PEM_CERTIFICATE_LABEL {
            return Err(BusyboxError::PemError(format!(
                "expected a {} block, found {}",
                PEM_CERTIFICATE_LABEL, pem.label
            )));
        }

        let (_, cert) = parse_x509_certificate(&pem.contents)
            .map_err(|e| BusyboxError::CertificateError(e.to_string()))?;

        Self::from_certificate(&cert)
    }

    pub fn from_certificate(cert: &X509Certificate<'_>) -> Result<Self> {
        let mut dns_names = Vec::new();
        let mut email_addresses = Vec::new();
        let mut ip_addresses = Vec::new();

        let san = cert
            .subject_alternative_name()
            .map_err(|e| BusyboxError::CertificateError(e.to_string()))?;
        if let Some(san) = san {
            for name in &san.value.general_names {
                match name {
                    GeneralName::DNSName(dns) => dns_names.push(dns.to_string()),
                    GeneralName::RFC822Name(email) => email_addresses.push(email.to_string()),
                    GeneralName::IPAddress(ip) => ip_addresses.push(format_ip(ip)),
                    _ => {}
                }
            }
        }

        Ok(Self {
            subject: format_name(cert.subject()),
            issuer_common_name: common_name(cert.issuer()),
            subject_common_name: common_name(cert.subject()),
            dns_names,
            email_addresses,
            ip_addresses,
            not_before: to_utc(cert.validity().not_before.timestamp())?,
            not_after: to_utc(cert.validity().not_after.timestamp())?,
        })
    }
}

impl fmt::Display for CertificateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Subject: {}", self.subject)?;
        writeln!(f, "Issuer CommonName: {}", self.issuer_common_name)?;
        writeln!(f, "Subject CommonName: {}", self.subject_common_name)?;
        writeln!(f, "DNSNames: [{}]", self.dns_names.join(", "))?;
        writeln!(f, "EmailAddresses: [{}]", self.email_addresses.join(", "))?;
        writeln!(f, "IPAddresses: [{}]", self.ip_addresses.join(", "))?;
        writeln!(f, "NotBefore: {}", self.not_before.format(TIME_FORMAT))?;
        writeln!(f, "NotAfter: {}", self.not_after.format(TIME_FORMAT))
    }
}

/// RFC 2253 string form of a name.
///
/// Well-known attributes are regrouped in the order C, ST, L, STREET,
/// POSTALCODE, O, OU, CN, SERIALNUMBER (one RDN per type, repeated values
/// joined with `+`) behind all other attributes, and the result is printed
/// last to first. Well-known attributes without a string value are dropped.
pub fn format_name(name: &X509Name<'_>) -> String {
    let attributes: Vec<_> = name.iter_attributes().collect();

    let mut rdns: Vec<Vec<String>> = attributes
        .iter()
        .filter(|attr| short_name(attr).is_none())
        .map(|attr| {
            vec![format!(
                "{}=#{}",
                attr.attr_type().to_id_string(),
                hex::encode(der_value(attr))
            )]
        })
        .collect();

    for (oid, short) in CANONICAL_ATTRIBUTES {
        let mut values: Vec<&str> = attributes
            .iter()
            .filter(|attr| attr.attr_type().to_id_string() == *oid)
            .filter_map(|attr| attr.as_str().ok())
            .collect();
        if SINGLE_VALUED.contains(oid) {
            values = values.split_off(values.len().saturating_sub(1));
        }
        if !values.is_empty() {
            rdns.push(
                values
                    .iter()
                    .map(|value| format!("{}={}", short, escape_value(value)))
                    .collect(),
            );
        }
    }

    rdns.iter()
        .rev()
        .map(|rdn| rdn.join("+"))
        .collect::<Vec<_>>()
        .join(",")
}

fn short_name(attr: &AttributeTypeAndValue<'_>) -> Option<&'static str> {
    let oid = attr.attr_type().to_id_string();
    CANONICAL_ATTRIBUTES
        .iter()
        .find(|(id, _)| *id == oid)
        .map(|(_, name)| *name)
}

/// DER encoding of an attribute value. String values are re-encoded as
/// PrintableString when every byte allows it and as UTF8String otherwise.
fn der_value(attr: &AttributeTypeAndValue<'_>) -> Vec<u8> {
    let value = attr.attr_value();
    let (mut der, content) = match attr.as_str() {
        Ok(s) if s.bytes().all(is_printable) => (vec![TAG_PRINTABLE_STRING], s.as_bytes()),
        Ok(s) => (vec![TAG_UTF8_STRING], s.as_bytes()),
        Err(_) => {
            let header = &value.header;
            let tag = match header.raw_tag() {
                Some(raw) => raw.to_vec(),
                None => {
                    let constructed = if header.is_constructed() { 0x20 } else { 0 };
                    let number = header.tag().0 as u8 & 0x1f;
                    vec![((header.class() as u8) << 6) | constructed | number]
                }
            };
            (tag, value.data)
        }
    };

    if content.len() < 0x80 {
        der.push(content.len() as u8);
    } else {
        let len = content.len().to_be_bytes();
        let skip = len.iter().take_while(|b| **b == 0).count();
        der.push(0x80 | (len.len() - skip) as u8);
        der.extend_from_slice(&len[skip..]);
    }
    der.extend_from_slice(content);
    der
}

fn is_printable(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b' ' | b'\'' | b'(' | b')' | b'+' | b',' | b'-' | b'.' | b'/' | b':' | b'=' | b'?'
        )
}

/// Escape an attribute value as described in RFC 2253 section 2.4
fn escape_value(value: &str) -> String {
    let last = value.len().saturating_sub(1);
    let mut escaped = String::with_capacity(value.len());

    for (i, c) in value.char_indices() {
        let needs_escape = match c {
            ',' | '+' | '"' | '\\' | '<' | '>' | ';' => true,
            ' ' => i == 0 || i == last,
            '#' => i == 0,
            _ => false,
        };
        if needs_escape {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// The last common name in the name, or an empty string
fn common_name(name: &X509Name<'_>) -> String {
    name.iter_common_name()
        .last()
        .and_then(|cn| cn.as_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn format_ip(bytes: &[u8]) -> String {
    let ip = match bytes.len() {
        4 => <[u8; 4]>::try_from(bytes).ok().map(|b| IpAddr::V4(Ipv4Addr::from(b))),
        16 => <[u8; 16]>::try_from(bytes).ok().map(|b| {
            let v6 = Ipv6Addr::from(b);
            v6.to_ipv4_mapped().map_or(IpAddr::V6(v6), IpAddr::V4)
        }),
        _ => None,
    };

    match ip {
        Some(ip) => ip.to_string(),
        None => format!("?{}", hex::encode(bytes)),
    }
}

fn to_utc(timestamp: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .ok_or_else(|| BusyboxError::TimestampError(format!("{} is out of range", timestamp)))
}
