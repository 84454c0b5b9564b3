// Voicemail servers in the cluster
use crate::cache::{Resource, ResourceCache};
use crate::display::Selectable;
use crate::xml::{parse_bool, parse_or_default, FieldMap, PropertyDump};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ServerState {
    #[default]
    Unknown,
    Primary,
    Secondary,
    Idle,
    SplitBrainResolution,
    Other(i32),
}

impl From<i32> for ServerState {
    fn from(value: i32) -> Self {
        match value {
            0 => ServerState::Unknown,
            1 => ServerState::Primary,
            2 => ServerState::Secondary,
            3 => ServerState::Idle,
            4 => ServerState::SplitBrainResolution,
            other => ServerState::Other(other),
        }
    }
}

impl ServerState {
    pub fn code(&self) -> i32 {
        match self {
            ServerState::Unknown => 0,
            ServerState::Primary => 1,
            ServerState::Secondary => 2,
            ServerState::Idle => 3,
            ServerState::SplitBrainResolution => 4,
            ServerState::Other(code) => *code,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VmsServer {
    pub vms_server_object_id: String,
    pub server_name: String,
    pub host_name: String,
    pub ip_address: String,
    pub server_state: ServerState,
    pub cluster_member_id: i32,
    // Raw flag text; the server sends both `true` and `1`
    pub subscriber: String,
}

pub type VmsServers = ResourceCache<VmsServer>;

impl VmsServer {
    pub fn is_primary(&self) -> bool {
        self.server_state == ServerState::Primary
    }

    pub fn is_subscriber(&self) -> bool {
        parse_bool(&self.subscriber)
    }
}

impl VmsServers {
    pub fn primary(&self) -> Option<&VmsServer> {
        self.iter().find(|server| server.is_primary())
    }
}

impl FieldMap for VmsServer {
    fn set_field(&mut self, name: &str, value: &str) {
        match name {
            "VmsServerObjectId" => self.vms_server_object_id = value.to_string(),
            "ServerName" => self.server_name = value.to_string(),
            "HostName" => self.host_name = value.to_string(),
            "IpAddress" => self.ip_address = value.to_string(),
            "ServerState" => self.server_state = ServerState::from(parse_or_default::<i32>(value)),
            "ClusterMemberId" => self.cluster_member_id = parse_or_default(value),
            "Subscriber" => self.subscriber = value.to_string(),
            _ => (),
        }
    }
}

impl PropertyDump for VmsServer {
    fn properties(&self) -> Vec<(&'static str, String)> {
        vec![
            ("VmsServerObjectId", self.vms_server_object_id.clone()),
            ("ServerName", self.server_name.clone()),
            ("HostName", self.host_name.clone()),
            ("IpAddress", self.ip_address.clone()),
            ("ServerState", self.server_state.code().to_string()),
            ("ClusterMemberId", self.cluster_member_id.to_string()),
            ("Subscriber", self.subscriber.clone()),
        ]
    }
}

impl Resource for VmsServer {
    type Key = String;
    const RESOURCE_NAME: &'static str = "VmsServer";
    const ELEMENT_NAME: &'static str = "VmsServer";
    const COLLECTION_PATH: &'static str = "/vmsservers";

    fn key(&self) -> String {
        self.vms_server_object_id.clone()
    }
}

impl Selectable for VmsServer {
    fn unique_identifier(&self) -> String {
        self.vms_server_object_id.clone()
    }

    fn selection_display_string(&self) -> String {
        self.server_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::error::CacheError;
    use crate::transport::{ConnectionServer, StaticTransport};
    use crate::xml::XmlElement;
    use std::sync::Arc;
    use test_case::test_case;

    const SERVERS_XML: &str = r#"<VmsServers total="2">
  <VmsServer>
    <VmsServerObjectId>6c1a9a4e-1b58-4d83-9d4e-7b6cc83b0a11</VmsServerObjectId>
    <ServerName>cuc-pub</ServerName>
    <HostName>cuc-pub.example.com</HostName>
    <IpAddress>10.1.1.10</IpAddress>
    <ServerState>1</ServerState>
    <ClusterMemberId>0</ClusterMemberId>
    <Subscriber>false</Subscriber>
  </VmsServer>
  <VmsServer>
    <VmsServerObjectId>0e5fd1c2-7f0f-4c52-a1f3-2b7f3f10c9d2</VmsServerObjectId>
    <ServerName>cuc-sub</ServerName>
    <HostName>cuc-sub.example.com</HostName>
    <IpAddress>10.1.1.11</IpAddress>
    <ServerState>2</ServerState>
    <ClusterMemberId>1</ClusterMemberId>
    <Subscriber>true</Subscriber>
  </VmsServer>
</VmsServers>"#;

    fn server_with(body: &str) -> ConnectionServer {
        let transport = Arc::new(StaticTransport::new().with_body("/vmsservers", body));
        ConnectionServer::with_transport(ServerConfig::new("cuc-pub", "admin", "secret"), transport)
    }

    #[test]
    fn test_load_servers() {
        let servers = VmsServers::load(&server_with(SERVERS_XML)).unwrap();
        assert_eq!(servers.len(), 2);

        let (sub, result) = servers.get(&"0e5fd1c2-7f0f-4c52-a1f3-2b7f3f10c9d2".to_string());
        assert!(result.success);
        assert_eq!(sub.server_name, "cuc-sub");
        assert_eq!(sub.server_state, ServerState::Secondary);
        assert!(sub.is_subscriber());

        let primary = servers.primary().unwrap();
        assert_eq!(primary.host_name, "cuc-pub.example.com");
    }

    #[test]
    fn test_missing_object_id_collides() {
        // Elements without an object id all map to the empty key
        let body = "<VmsServers><VmsServer><ServerName>a</ServerName></VmsServer>\
                    <VmsServer><ServerName>b</ServerName></VmsServer></VmsServers>";
        let err = VmsServers::load(&server_with(body)).unwrap_err();
        assert!(matches!(err, CacheError::DuplicateKey { resource: "VmsServer", .. }));
    }

    #[test]
    fn test_miss_on_string_key() {
        let servers = VmsServers::load(&server_with(SERVERS_XML)).unwrap();
        let (server, result) = servers.get(&"no-such-id".to_string());
        assert!(!result.success);
        assert!(result.error_text.contains("no-such-id"));
        assert_eq!(server, VmsServer::default());
    }

    #[test]
    fn test_sorted_for_display() {
        let servers = VmsServers::load(&server_with(SERVERS_XML)).unwrap();
        let names: Vec<String> = servers
            .sorted_for_display()
            .unwrap()
            .into_iter()
            .map(|s| s.server_name)
            .collect();
        assert_eq!(names, vec!["cuc-pub", "cuc-sub"]);
    }

    #[test]
    fn test_dump_reproduces_source_fields() {
        let root = XmlElement::parse(SERVERS_XML).unwrap();
        for element in &root.children {
            let server = VmsServer::from_element(element);
            let dump = server.dump_all_props();
            for child in &element.children {
                let line = format!("{}: {}\n", child.name, child.text);
                assert!(dump.contains(&line), "missing {:?} in {:?}", line, dump);
            }
        }
    }

    #[test_case("1", true; "#1 numeric true")]
    #[test_case("0", false; "#2 numeric false")]
    #[test_case("true", true; "#3 word true")]
    #[test_case("false", false; "#4 word false")]
    fn test_subscriber_flag_round_trips(text: &str, expected: bool) {
        let element = XmlElement::parse(&format!(
            "<VmsServer><VmsServerObjectId>x</VmsServerObjectId><Subscriber>{}</Subscriber></VmsServer>",
            text
        ))
        .unwrap();
        let server = VmsServer::from_element(&element);

        assert_eq!(server.is_subscriber(), expected);
        assert!(server
            .dump_all_props()
            .contains(&format!("Subscriber: {}\n", text)));
    }

    #[test_case(0, ServerState::Unknown; "#1 unknown")]
    #[test_case(1, ServerState::Primary; "#2 primary")]
    #[test_case(4, ServerState::SplitBrainResolution; "#3 split brain")]
    #[test_case(9, ServerState::Other(9); "#4 unrecognised")]
    fn test_server_state_codes(code: i32, state: ServerState) {
        assert_eq!(ServerState::from(code), state);
        assert_eq!(state.code(), code);
    }
}
