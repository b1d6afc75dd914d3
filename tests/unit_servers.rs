#![allow(missing_docs)]

use nbtool::nbt::{Compression, decode, encode};

#[derive(Debug, Default, PartialEq)]
struct Server {
	name: String,
	ip: String,
}

nbtool::nbt_record!(Server { name, ip });

#[derive(Debug, Default, PartialEq)]
struct ServerList {
	servers: Vec<Server>,
}

nbtool::nbt_record!(ServerList { servers });

fn push_name(wire: &mut Vec<u8>, name: &str) {
	wire.extend_from_slice(&(name.len() as u16).to_be_bytes());
	wire.extend_from_slice(name.as_bytes());
}

fn push_string_field(wire: &mut Vec<u8>, name: &str, value: &str) {
	wire.push(8);
	push_name(wire, name);
	push_name(wire, value);
}

fn server_list_wire(servers: &[(&str, &str)]) -> Vec<u8> {
	let mut wire = vec![10, 0, 0];
	wire.push(9);
	push_name(&mut wire, "servers");
	wire.push(10);
	wire.extend_from_slice(&u32::try_from(servers.len()).expect("fixture fits u32").to_be_bytes());
	for (name, ip) in servers {
		push_string_field(&mut wire, "name", name);
		push_string_field(&mut wire, "ip", ip);
		wire.push(0);
	}
	wire.push(0);
	wire
}

#[test]
fn server_list_decodes_in_wire_order() {
	let wire = server_list_wire(&[
		("alpha", "10.0.0.1:25565"),
		("beta", "10.0.0.2:25565"),
		("gamma", "mc.example.net"),
	]);

	let mut list = ServerList::default();
	decode(Compression::None, wire.as_slice(), &mut list).expect("decode succeeds");

	let names: Vec<&str> = list.servers.iter().map(|s| s.name.as_str()).collect();
	assert_eq!(names, ["alpha", "beta", "gamma"]);
	assert_eq!(list.servers[2].ip, "mc.example.net");
}

#[test]
fn server_list_round_trips() {
	let reference = ServerList {
		servers: vec![
			Server { name: "home".to_owned(), ip: "127.0.0.1".to_owned() },
			Server { name: "hub".to_owned(), ip: "hub.example.net:25566".to_owned() },
		],
	};

	let mut wire = Vec::new();
	encode(Compression::None, &mut wire, &reference).expect("encode succeeds");

	let mut result = ServerList::default();
	decode(Compression::None, wire.as_slice(), &mut result).expect("decode succeeds");
	assert_eq!(result, reference);
}

#[test]
fn mismatched_leaf_reports_full_path() {
	#[derive(Debug, Default)]
	struct BadServer {
		name: String,
		ip: f32,
	}

	nbtool::nbt_record!(BadServer { name, ip });

	#[derive(Debug, Default)]
	struct BadServerList {
		servers: Vec<BadServer>,
	}

	nbtool::nbt_record!(BadServerList { servers });

	let wire = server_list_wire(&[("alpha", "10.0.0.1:25565")]);

	let mut list = BadServerList::default();
	let err = decode(Compression::None, wire.as_slice(), &mut list).expect_err("string ip cannot fill f32");
	assert_eq!(
		err.to_string(),
		"tag TAG_String (0x08) cannot decode into f32 at field \"ip\" at list index 0 at field \"servers\""
	);
}

#[test]
fn unknown_field_reports_full_path() {
	let mut wire = vec![10, 0, 0];
	wire.push(9);
	push_name(&mut wire, "servers");
	wire.push(10);
	wire.extend_from_slice(&2u32.to_be_bytes());
	push_string_field(&mut wire, "name", "alpha");
	push_string_field(&mut wire, "ip", "10.0.0.1");
	wire.push(0);
	push_string_field(&mut wire, "name", "beta");
	push_string_field(&mut wire, "motd", "hello");
	wire.push(0);
	wire.push(0);

	let mut list = ServerList::default();
	let err = decode(Compression::None, wire.as_slice(), &mut list).expect_err("unmapped field is rejected");
	assert_eq!(
		err.to_string(),
		"unhandled tag TAG_String (0x08) named \"motd\" in Server at list index 1 at field \"servers\""
	);
}
