//! Loopback DNS servers for exercising the hickory clients

use hickory_client::op::{Message, MessageType, ResponseCode};
use std::io::{Read, Write};
use std::net::{TcpListener, UdpSocket};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Response header and question section for `request`
pub fn reply_to(request: &Message, rcode: ResponseCode) -> Message {
    let mut reply = Message::new();
    reply
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(request.op_code())
        .set_response_code(rcode)
        .add_queries(request.queries().to_vec());
    reply
}

/// Answer one datagram with `respond`; the thread yields the query
pub fn answer_udp_once<F>(socket: UdpSocket, respond: F) -> JoinHandle<Message>
where
    F: FnOnce(&Message) -> Message + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        let (len, peer) = socket.recv_from(&mut buf).unwrap();
        let request = Message::from_vec(&buf[..len]).unwrap();

        let reply = respond(&request).to_vec().unwrap();
        socket.send_to(&reply, peer).unwrap();
        request
    })
}

/// Answer the first message of the first connection; the thread yields it
pub fn answer_tcp_once<F>(listener: TcpListener, respond: F) -> JoinHandle<Message>
where
    F: FnOnce(&Message) -> Message + Send + 'static,
{
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();

        let mut len = [0u8; 2];
        stream.read_exact(&mut len).unwrap();
        let mut buf = vec![0u8; usize::from(u16::from_be_bytes(len))];
        stream.read_exact(&mut buf).unwrap();
        let request = Message::from_vec(&buf).unwrap();

        let reply = respond(&request).to_vec().unwrap();
        let reply_len = u16::try_from(reply.len()).unwrap();
        stream.write_all(&reply_len.to_be_bytes()).unwrap();
        stream.write_all(&reply).unwrap();

        // hold the connection until the client hangs up
        let _ = stream.read(&mut [0u8; 1]);
        request
    })
}
