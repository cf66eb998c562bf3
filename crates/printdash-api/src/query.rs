// `/devices` query construction.
//
// The endpoint selects sensor entities whose id starts with `prefix` and
// ends with one of the comma-separated `suffix` values, then groups them
// per device.

use url::Url;

/// Query parameters for `GET /devices`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicesQuery {
    /// Entity id prefix, e.g. `sensor.cometrue_`.
    pub prefix: String,
    /// Metric keys requested from the endpoint, in configuration order.
    pub suffixes: Vec<String>,
}

impl DevicesQuery {
    /// Build the query for a device family.
    ///
    /// The prefix is `sensor.<lowercased device name>_`; entity ids are
    /// registered lowercase on the backend.
    pub fn for_device<I, S>(device_name: &str, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefix: format!("sensor.{}_", device_name.to_lowercase()),
            suffixes: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// The `suffix` parameter value: every key joined by `,`.
    pub fn suffix_param(&self) -> String {
        self.suffixes.join(",")
    }

    /// Resolve the full request URL against an endpoint base URL.
    ///
    /// `http://host:8099` and `http://host:8099/addon/` both resolve to a
    /// `/devices` path below the base path. Any query already present on the
    /// base is replaced.
    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        let path = format!("{}/devices", base.path().trim_end_matches('/'));
        url.set_path(&path);
        url.set_fragment(None);
        url.query_pairs_mut()
            .clear()
            .append_pair("prefix", &self.prefix)
            .append_pair("suffix", &self.suffix_param());
        url
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prefix_is_lowercased() {
        let q = DevicesQuery::for_device("ComeTrue", ["_action"]);
        assert_eq!(q.prefix, "sensor.cometrue_");
    }

    #[test]
    fn url_carries_every_key_encoded() {
        let q = DevicesQuery::for_device("ComeTrue", ["_action", "_dn", "_page"]);
        let base = Url::parse("http://printer.local:8099").unwrap();
        let url = q.to_url(&base);

        assert_eq!(url.path(), "/devices");
        assert_eq!(
            url.query(),
            Some("prefix=sensor.cometrue_&suffix=_action%2C_dn%2C_page")
        );

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("prefix".into(), "sensor.cometrue_".into()),
                ("suffix".into(), "_action,_dn,_page".into()),
            ]
        );
    }

    #[test]
    fn base_path_is_kept() {
        let q = DevicesQuery::for_device("ZP2", ["_p25"]);
        let base = Url::parse("http://ha.local/api/hassio_ingress/abc/?stale=1").unwrap();
        let url = q.to_url(&base);
        assert_eq!(url.path(), "/api/hassio_ingress/abc/devices");
        assert!(!url.query().unwrap().contains("stale"));
    }
}
