use rtnetlink::packet_core::{NetlinkPayload, Nla};
use rtnetlink::packet_route::{
    RouteNetlinkMessage,
    tc::{TcAttribute, TcHandle},
};
use taprio_tc::{QdiscTaprioRequest, QdiscTarget, args, parse_handle};

#[test]
fn options_survive_the_request() {
    let config = args::parse(["num_tc", "2", "map", "0", "1", "sched-row", "0", "S", "3", "1000"])
        .unwrap();
    let target = QdiscTarget::new(7)
        .with_parent(parse_handle("root").unwrap())
        .with_handle(parse_handle("100:").unwrap());
    let nl_req = QdiscTaprioRequest::new(target, &config).unwrap().with_replace(true).build();

    let NetlinkPayload::InnerMessage(RouteNetlinkMessage::NewQueueDiscipline(msg)) = nl_req.payload
    else {
        panic!("not a qdisc request");
    };
    assert_eq!(msg.header.index, 7);
    assert_eq!(msg.header.handle, TcHandle::from(0x0100_0000));

    let options = msg
        .attributes
        .iter()
        .find_map(|attr| match attr {
            TcAttribute::Other(nla) => Some(nla),
            _ => None,
        })
        .unwrap();
    let mut value = vec![0; options.value_len()];
    options.emit_value(&mut value);

    assert_eq!(taprio_wire::decode(&value).unwrap(), config);
}
